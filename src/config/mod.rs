//! Client configuration (code > environment).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{FlagdeckError, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Flagdeck API client.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use flagdeck::config::ClientConfig;
///
/// let config = ClientConfig::new("https://api.flagdeck.example")
///     .with_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the admin API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Directory for the file-backed token store. `None` uses the default
    /// (`~/.flagdeck`).
    pub token_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            token_dir: None,
        }
    }

    /// Load from environment variables (`FLAGDECK_BASE_URL`,
    /// `FLAGDECK_TIMEOUT_SECS`, `FLAGDECK_TOKEN_DIR`), reading `.env` first
    /// if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let base_url = std::env::var("FLAGDECK_BASE_URL").map_err(|_| {
            FlagdeckError::Configuration("FLAGDECK_BASE_URL is not set".to_string())
        })?;
        let mut config = Self::new(base_url);
        if let Ok(secs) = std::env::var("FLAGDECK_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                FlagdeckError::Configuration(format!("invalid FLAGDECK_TIMEOUT_SECS: {secs}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(dir) = std::env::var("FLAGDECK_TOKEN_DIR") {
            config.token_dir = Some(PathBuf::from(dir));
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.token_dir = Some(dir.into());
        self
    }

    /// Build the reqwest client used for all API traffic.
    pub(crate) fn build_http(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(|err| FlagdeckError::Network(err.to_string()))
    }
}
