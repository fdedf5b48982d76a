//! Application configuration module
//!
//! Loads SDK settings from `YELLOW_*` environment variables using the
//! `config` and `dotenvy` crates. This is the only place the process
//! environment is read; `YellowClient` itself takes an explicit
//! [`ClientConfig`](crate::adapters::yellow::ClientConfig).
//!
//! # Example
//!
//! ```no_run
//! use yellowpay_sdk::config::YellowConfig;
//!
//! let config = YellowConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using API server {}", config.server_root());
//! ```

mod error;

pub use error::{ConfigError, ValidationError};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Default root of the Yellow API.
pub const DEFAULT_SERVER_ROOT: &str = "https://api.yellowpay.co/v1";

/// SDK configuration
///
/// | Variable | Field | Default |
/// |---|---|---|
/// | `YELLOW_API_KEY` | `api_key` | required |
/// | `YELLOW_API_SECRET` | `api_secret` | required |
/// | `YELLOW_API_SERVER` | `api_server` | `https://api.yellowpay.co/v1` |
/// | `YELLOW_REQUEST_TIMEOUT_SECS` | `request_timeout_secs` | 30 |
/// | `YELLOW_PLATFORM` | `platform` | `<os> <arch> [<os release>] - Rust` |
/// | `YELLOW_LOG_LEVEL` | `log_level` | `info,yellowpay_sdk=debug` |
/// | `YELLOW_LOG_JSON` | `log_json` | false |
#[derive(Debug, Clone, Deserialize)]
pub struct YellowConfig {
    /// Public API key
    pub api_key: String,

    /// Shared API secret (request signing and IPN verification)
    pub api_secret: SecretString,

    /// Custom API server root
    pub api_server: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Override for the `API-Platform` header
    pub platform: Option<String>,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

impl YellowConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `YELLOW_` prefix
    /// 3. Deserializes into a typed configuration struct
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("YELLOW").prefix_separator("_"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadError` if loading fails and
    /// `ConfigError::ValidationFailed` if the loaded values are invalid.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Effective API server root
    pub fn server_root(&self) -> &str {
        self.api_server.as_deref().unwrap_or(DEFAULT_SERVER_ROOT)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if credentials are empty, the server root is
    /// not an http(s) URL without a trailing slash, or the timeout is outside
    /// 1..=300 seconds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("YELLOW_API_KEY"));
        }
        if self.api_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("YELLOW_API_SECRET"));
        }

        let root = self.server_root();
        if !(root.starts_with("https://") || root.starts_with("http://")) || root.ends_with('/') {
            return Err(ValidationError::InvalidServerRoot);
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info,yellowpay_sdk=debug".to_string()
}
