//! Result and error types for rcprobe.

use thiserror::Error;

/// Result type for rcprobe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving a remote browser session
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The remote-control server could not be reached, or the exchange broke off
    #[error("Transport error: {message}")]
    Transport {
        /// Error message
        message: String,
    },

    /// The remote-control server rejected a command
    #[error("Command {command} failed: {message}")]
    Command {
        /// Command name
        command: String,
        /// Error text returned by the server
        message: String,
    },

    /// A command needing a session was issued before `start` or after `stop`
    #[error("No remote session: {message}")]
    NoSession {
        /// Error message
        message: String,
    },

    /// `start` was called on a processor that already holds a session
    #[error("Session already active: {session_id}")]
    SessionActive {
        /// Id of the open session
        session_id: String,
    },

    /// The server replied with something that is not a remote-control reply
    #[error("Protocol error: {message}")]
    Protocol {
        /// Error message
        message: String,
    },

    /// A wait exhausted its budget
    #[error("Timed out waiting for {what} after {attempts} attempt(s) ({elapsed_ms}ms)")]
    Timeout {
        /// What was waited for
        what: String,
        /// Attempts made
        attempts: usize,
        /// Elapsed wall-clock time in milliseconds
        elapsed_ms: u64,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create a transport error
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a command error
    #[must_use]
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a protocol error
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create an assertion error
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::AssertionFailed {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether another attempt could succeed.
    ///
    /// A page that is still rendering can make a query fail in any way: an
    /// unreachable or hung server, a rejected command, an empty or garbled
    /// reply. Only session bookkeeping errors are permanent, since no amount
    /// of waiting opens or closes a session.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        !matches!(self, Self::NoSession { .. } | Self::SessionActive { .. })
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProbeError::transport("refused").is_transient());
        assert!(ProbeError::command("isElementPresent", "not ready").is_transient());
        assert!(ProbeError::protocol("empty reply to isElementPresent").is_transient());
        assert!(!ProbeError::NoSession {
            message: "not started".into()
        }
        .is_transient());
        assert!(!ProbeError::SessionActive {
            session_id: "f00dcafe".into()
        }
        .is_transient());
    }

    #[test]
    fn test_timeout_display_names_target() {
        let err = ProbeError::Timeout {
            what: "element id=myButton".into(),
            attempts: 60,
            elapsed_ms: 59_000,
        };
        let msg = err.to_string();
        assert!(msg.contains("id=myButton"));
        assert!(msg.contains("60 attempt(s)"));
    }

    #[test]
    fn test_command_display() {
        let err = ProbeError::command("qxClickAt", "ERROR: Element id=x not found");
        assert_eq!(
            err.to_string(),
            "Command qxClickAt failed: ERROR: Element id=x not found"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: ProbeError = io.into();
        assert!(matches!(err, ProbeError::Io(_)));
    }
}
