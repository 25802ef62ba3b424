//! # Client Configuration Module
//!
//! Loads settings for the HealthSync client from environment variables,
//! providing defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `HEALTHSYNC_API_URL`: Base URL of the backend (default: "http://localhost:8000")
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `HEALTHSYNC_REQUEST_TIMEOUT_SECONDS`: Per-request timeout (default: 30)
//! - `HEALTHSYNC_SESSION_FILE`: Path of the persisted session (optional, in-memory when unset)

use eyre::{Result, WrapErr};
use std::{env, path::PathBuf, time::Duration};
use tracing::Level;

/// Configuration for the HealthSync client
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use healthsync_client::config::ClientConfig;
///
/// fn example() -> Result<()> {
///     let config = ClientConfig::from_env()?;
///     println!("Talking to {}", config.api_url);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash
    pub api_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Where the session is persisted between runs
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            log_level: Level::INFO,
            request_timeout: 30,
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Creates a new ClientConfig from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `HEALTHSYNC_API_URL` is set but is not an
    /// `http://` or `https://` URL, or if the timeout is not a number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let api_url = lookup("HEALTHSYNC_API_URL").unwrap_or(defaults.api_url);
        let api_url = normalize_base_url(&api_url)?;

        let log_level = lookup("LOG_LEVEL").map_or(defaults.log_level, |value| parse_level(&value));

        let request_timeout = match lookup("HEALTHSYNC_REQUEST_TIMEOUT_SECONDS") {
            Some(value) => value
                .trim()
                .parse()
                .wrap_err_with(|| {
                    format!("Invalid HEALTHSYNC_REQUEST_TIMEOUT_SECONDS value {:?}", value)
                })?,
            None => defaults.request_timeout,
        };

        let session_file = lookup("HEALTHSYNC_SESSION_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_url,
            log_level,
            request_timeout,
            session_file,
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Strips trailing slashes and checks the scheme.
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(eyre::eyre!(
            "HEALTHSYNC_API_URL must start with http:// or https://, got {:?}",
            raw
        ));
    }
    Ok(trimmed.to_string())
}

pub fn parse_level(value: &str) -> Level {
    match value.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
