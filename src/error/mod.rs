//! Error types for Flagdeck.

use thiserror::Error;

/// Primary error type for all Flagdeck operations.
#[derive(Error, Debug)]
pub enum FlagdeckError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<reqwest::Error> for FlagdeckError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl FlagdeckError {
    /// Create an API error from a status code and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether this error indicates the session itself is invalid.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated
                | Self::Authentication(_)
                | Self::Api {
                    status: 401 | 403,
                    ..
                }
        )
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Api { status, .. } => (500..=599).contains(status) || *status == 429,
            _ => false,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, FlagdeckError>;
