//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// At least one scenario failed
    #[error("{failed} of {executed} scenarios failed")]
    ScenariosFailed {
        /// Failed scenarios
        failed: usize,
        /// Scenarios that ran
        executed: usize,
    },

    /// Report generation error
    #[error("Report generation failed: {message}")]
    ReportGeneration {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Suite library error
    #[error(transparent)]
    Shop(#[from] shopcheck::ShopError),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a report generation error
    #[must_use]
    pub fn report_generation(message: impl Into<String>) -> Self {
        Self::ReportGeneration {
            message: message.into(),
        }
    }
}
