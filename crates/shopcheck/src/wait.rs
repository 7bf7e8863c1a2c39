//! Wait mechanisms.
//!
//! Everything that used to be a fixed pause in a storefront script is a
//! polled condition here: the loop re-evaluates the condition every
//! `poll_interval` until it holds or `timeout` elapses. Errors raised by the
//! condition are treated as transient and polled through.

use crate::result::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::{Duration, Instant};

/// Default timeout for wait operations (10 seconds)
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 10_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Page load states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// Wait for the `load` event to fire
    Load,
    /// Wait for `DOMContentLoaded` event
    #[default]
    DomContentLoaded,
    /// Wait for network to be idle (no requests for 500ms)
    NetworkIdle,
}

impl LoadState {
    /// Get the JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::NetworkIdle => "networkidle",
        }
    }

    /// Script returning true once the document reached this state.
    ///
    /// Network idleness is approximated with the resource timing buffer:
    /// complete document and no resource started in the last 500ms.
    #[must_use]
    pub const fn ready_script(&self) -> &'static str {
        match self {
            Self::DomContentLoaded => "document.readyState !== 'loading'",
            Self::Load => "document.readyState === 'complete'",
            Self::NetworkIdle => {
                "document.readyState === 'complete' && \
                 performance.getEntriesByType('resource').every(e => e.responseEnd > 0 && performance.now() - e.responseEnd > 500)"
            }
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration (never zero)
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        if self.poll_interval_ms == 0 {
            Duration::from_millis(1)
        } else {
            Duration::from_millis(self.poll_interval_ms)
        }
    }
}

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of condition evaluations
    pub attempts: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Poll `condition` until it yields `Ok(true)`.
///
/// The condition is evaluated at least once, even with a zero timeout.
/// `Ok(false)` and `Err(_)` both mean "not yet"; the last error is logged at
/// trace level.
pub async fn wait_for<F, Fut>(
    options: &WaitOptions,
    description: &str,
    mut condition: F,
) -> ShopResult<WaitResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ShopResult<bool>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let mut attempts = 0_u32;

    loop {
        attempts += 1;
        match condition().await {
            Ok(true) => {
                return Ok(WaitResult {
                    elapsed: start.elapsed(),
                    attempts,
                    waited_for: description.to_string(),
                });
            }
            Ok(false) => {}
            Err(e) => tracing::trace!(condition = description, error = %e, "condition errored, polling again"),
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            break;
        }
        let remaining = timeout.saturating_sub(elapsed);
        tokio::time::sleep(options.poll_interval().min(remaining)).await;
    }

    Err(ShopError::WaitTimeout {
        condition: description.to_string(),
        timeout_ms: options.timeout_ms,
    })
}

/// Poll a boolean condition; `false` on timeout.
pub async fn poll_until<F, Fut>(options: &WaitOptions, description: &str, mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    wait_for(options, description, || {
        let fut = condition();
        async move { Ok(fut.await) }
    })
    .await
    .is_ok()
}

/// Poll until `check` yields a value; `None` on timeout.
///
/// Used where several outcomes race, e.g. an error banner against a
/// success indicator.
pub async fn poll_for<T, F, Fut>(options: &WaitOptions, description: &str, mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    loop {
        if let Some(value) = check().await {
            return Some(value);
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            tracing::debug!(condition = description, timeout_ms = options.timeout_ms, "poll gave up");
            return None;
        }
        tokio::time::sleep(options.poll_interval().min(timeout.saturating_sub(elapsed))).await;
    }
}

/// Wait for a fixed duration (discouraged - use wait conditions instead)
pub async fn wait_timeout(duration: Duration) {
    tokio::time::sleep(duration).await;
}
