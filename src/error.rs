// src/error.rs
// Error taxonomy for the relay

use thiserror::Error;

/// Main error type for the relay library
#[derive(Error, Debug)]
pub enum RelayError {
    /// The client sent something we refuse to forward upstream.
    #[error("{0}")]
    Validation(String),

    /// The completion provider failed or returned something unusable.
    #[error("{0}")]
    Upstream(String),

    /// Startup configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a `RelayError`, for assertions and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Upstream,
    Config,
}

/// Convenience type alias for Result using RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        RelayError::Validation(message.into())
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        RelayError::Upstream(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        RelayError::Config(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::Validation(_) => ErrorKind::Validation,
            RelayError::Upstream(_) => ErrorKind::Upstream,
            RelayError::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(err: reqwest::Error) -> Self {
        RelayError::Upstream(err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Upstream(format!("malformed provider payload: {err}"))
    }
}
