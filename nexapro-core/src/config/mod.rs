//! Configuration management for NexaPro Core

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Backend used when `NEXAPRO_API_BASE_URL` is not set
pub const DEFAULT_API_BASE_URL: &str = "https://nexaproapi.quantumvision-tech.com/api/v1";

/// Access layer configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// REST backend base URL, without trailing slash
    pub api_base_url: String,
    /// Per-request timeout applied by the HTTP client
    pub request_timeout: Duration,
    /// File holding the persisted session and locale preference
    pub session_file: PathBuf,
    /// How long the session-expired notice stays up before redirecting to login
    pub session_notice_duration: Duration,
    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "json" or "pretty"
    pub log_format: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Configuration pointing at `api_base_url` with every other setting at its default.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(&api_base_url.into()),
            request_timeout: Duration::from_secs(30),
            session_file: PathBuf::from(".nexapro_session.json"),
            session_notice_duration: Duration::from_millis(2000),
            telemetry: TelemetryConfig::default(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url =
            lookup("NEXAPRO_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        url::Url::parse(&api_base_url).context("Invalid NEXAPRO_API_BASE_URL")?;

        let mut config = Self::new(api_base_url);

        if let Some(secs) = lookup("NEXAPRO_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .context("Invalid NEXAPRO_REQUEST_TIMEOUT_SECS")?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = lookup("NEXAPRO_SESSION_FILE") {
            config.session_file = PathBuf::from(path);
        }
        if let Some(millis) = lookup("NEXAPRO_SESSION_NOTICE_MS") {
            let millis: u64 = millis
                .parse()
                .context("Invalid NEXAPRO_SESSION_NOTICE_MS")?;
            config.session_notice_duration = Duration::from_millis(millis);
        }
        config.telemetry.log_format = lookup("LOG_FORMAT")
            .map(|s| s.to_lowercase())
            .unwrap_or_else(|| "pretty".to_string());

        Ok(config)
    }

    /// Absolute URL for a backend path such as `/owners/`.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
