//! Checkout configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `KIKUUBO_API_BASE_URL` - Base URL of the commerce REST backend
//!
//! ## Optional
//! - `KIKUUBO_API_TOKEN` - Bearer token for the backend
//! - `KIKUUBO_POLL_INTERVAL_SECS` - Payment poll interval (default: 5)
//! - `KIKUUBO_POLL_TIMEOUT_SECS` - Payment poll timeout (default: 300)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Checkout application configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct CheckoutConfig {
    /// Base URL of the commerce REST backend (no trailing slash).
    pub api_base_url: String,
    /// Bearer token for the backend, if the deployment requires one.
    pub api_token: Option<SecretString>,
    /// Payment status poll interval.
    pub poll_interval: Duration,
    /// Payment status poll timeout, measured from poll start.
    pub poll_timeout: Duration,
}

impl std::fmt::Debug for CheckoutConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutConfig")
            .field("api_base_url", &self.api_base_url)
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("poll_interval", &self.poll_interval)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}

impl CheckoutConfig {
    /// Default payment poll interval during checkout.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
    /// Default overall payment poll timeout.
    pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(300);

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("KIKUUBO_API_BASE_URL")?
            .trim_end_matches('/')
            .to_owned();
        let api_token = get_optional_env("KIKUUBO_API_TOKEN").map(SecretString::from);
        let poll_interval = get_duration_secs(
            "KIKUUBO_POLL_INTERVAL_SECS",
            Self::DEFAULT_POLL_INTERVAL,
        )?;
        let poll_timeout =
            get_duration_secs("KIKUUBO_POLL_TIMEOUT_SECS", Self::DEFAULT_POLL_TIMEOUT)?;

        Ok(Self {
            api_base_url,
            api_token,
            poll_interval,
            poll_timeout,
        })
    }

    /// Build a configuration for a known base URL with default polling.
    ///
    /// Intended for tests and embedding; production loads from the
    /// environment.
    #[must_use]
    pub const fn for_base_url(api_base_url: String) -> Self {
        Self {
            api_base_url,
            api_token: None,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            poll_timeout: Self::DEFAULT_POLL_TIMEOUT,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an optional duration (in whole seconds) with a default.
fn get_duration_secs(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
    }
}
