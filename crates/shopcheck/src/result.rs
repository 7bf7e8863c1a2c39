//! Result and error types for shopcheck.

use thiserror::Error;

/// Result type for shopcheck operations
pub type ShopResult<T> = Result<T, ShopError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ShopError {
    /// Page load did not reach the requested state in time
    #[error("Navigation to {url} timed out after {timeout_ms}ms")]
    NavigationTimeout {
        /// URL that was being loaded
        url: String,
        /// Bound that elapsed
        timeout_ms: u64,
    },

    /// Navigation was rejected by the browser
    #[error("Navigation to {url} failed: {message}")]
    NavigationError {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Element never became visible
    #[error("Element {locator} not visible after {timeout_ms}ms")]
    ElementNotFound {
        /// Locator description
        locator: String,
        /// Bound that elapsed
        timeout_ms: u64,
    },

    /// Element exists but cannot receive the action (hidden, disabled, detached)
    #[error("Element {locator} is not interactable: {reason}")]
    ElementNotInteractable {
        /// Locator description
        locator: String,
        /// Why the action was refused
        reason: String,
    },

    /// The login form reported too many attempts
    #[error("Rate limited by the storefront: {message}")]
    RateLimited {
        /// Banner text including the wait time shown to the user
        message: String,
    },

    /// Scenario assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Scenario exceeded its overall bound
    #[error("Scenario {scenario} timed out after {timeout_ms}ms")]
    ScenarioTimeout {
        /// Scenario id
        scenario: String,
        /// Bound that elapsed
        timeout_ms: u64,
    },

    /// A polled condition never held
    #[error("Wait for '{condition}' timed out after {timeout_ms}ms")]
    WaitTimeout {
        /// Description of the condition
        condition: String,
        /// Bound that elapsed
        timeout_ms: u64,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Low-level driver failure (CDP, script evaluation, closed page)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ShopError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a not-interactable error for a locator
    #[must_use]
    pub fn not_interactable(locator: impl ToString, reason: impl Into<String>) -> Self {
        Self::ElementNotInteractable {
            locator: locator.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether a retry of the same scenario can possibly succeed.
    ///
    /// Rate limiting is tied to server-side counters that survive cookie
    /// resets, so retrying only burns more attempts.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::RateLimited { .. } | Self::Config { .. })
    }
}
