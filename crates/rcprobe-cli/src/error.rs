//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Scenario run error that is not a probe failure
    #[error("Scenario failed: {message}")]
    Scenario {
        /// Error message
        message: String,
    },

    /// Demo server error
    #[error("Server error: {message}")]
    Server {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// rcprobe library error
    #[error("{0}")]
    Probe(#[from] rcprobe::ProbeError),
}

impl CliError {
    /// Create a scenario error
    #[must_use]
    pub fn scenario(message: impl Into<String>) -> Self {
        Self::Scenario {
            message: message.into(),
        }
    }

    /// Create a server error
    #[must_use]
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }
}
