use thiserror::Error;

use crate::error::FlagdeckError;

/// Errors raised by token storage and the auth endpoints.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not signed in")]
    NotSignedIn,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Refresh rejected (status {status})")]
    RefreshRejected { status: u16 },
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AuthError {
    /// Fatal errors end the session: the refresh token is dead or absent,
    /// and retrying cannot help. Everything else is transient.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotSignedIn | Self::InvalidCredentials | Self::RefreshRejected { .. }
        )
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::ser::Error> for AuthError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

/// Only fatal auth errors become authentication errors; a transient failure
/// during a refresh keeps its transient classification so callers do not
/// treat a network blip as an invalid session.
impl From<AuthError> for FlagdeckError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::NotSignedIn => FlagdeckError::Unauthenticated,
            AuthError::RefreshRejected { .. } | AuthError::InvalidCredentials => {
                FlagdeckError::Authentication(error.to_string())
            }
            AuthError::Api { status, message } => FlagdeckError::Api { status, message },
            AuthError::Network(message) => FlagdeckError::Network(message),
            AuthError::Io(message) => FlagdeckError::Io(std::io::Error::other(message)),
            AuthError::InvalidResponse(message) | AuthError::Serialization(message) => {
                FlagdeckError::InvalidResponse(message)
            }
        }
    }
}
