//! Configuration module for thermopad.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and a default on-disk location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default base URL of the device-control API
pub const DEFAULT_BASE_URL: &str = "https://api.developer.sleep.me/v1";

/// Top-level configuration for thermopad.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API endpoint and credential settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the device-control API.
    pub base_url: String,
    /// Bearer token for API authentication. `None` until `thermopad setup` runs.
    pub token: Option<String>,
    /// Identifier of the device this installation controls.
    pub device_id: Option<String>,
    /// Per-request transport timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            device_id: None,
            request_timeout_secs: 10,
        }
    }
}

/// Request pacing and retry settings.
///
/// The API enforces a strict per-minute quota, so the defaults here stay
/// one request under the documented limit of 10 per minute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum requests admitted within one window.
    pub max_requests_per_window: usize,
    /// Length of the sliding window in seconds.
    pub window_secs: u64,
    /// Base backoff after an HTTP 429, doubled per retry consumed.
    pub rate_limit_backoff_secs: u64,
    /// Base backoff after a 5xx or timeout, doubled per retry consumed.
    pub server_error_backoff_secs: u64,
    /// Default number of attempts per logical request.
    pub max_attempts: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests_per_window: 9,
            window_secs: 60,
            rate_limit_backoff_secs: 30,
            server_error_backoff_secs: 10,
            max_attempts: 3,
        }
    }
}

/// Background refresh settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between device status polls.
    pub poll_interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
        }
    }
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Serialize to YAML and write to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config file location: `$XDG_CONFIG_HOME/thermopad/config.yaml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("thermopad")
            .join("config.yaml")
    }

    /// Validate configuration values, returning the first problem found.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api.base_url.is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.api.request_timeout_secs == 0 {
            anyhow::bail!("api.request_timeout_secs must be positive");
        }
        if self.rate_limit.max_requests_per_window == 0 {
            anyhow::bail!("rate_limit.max_requests_per_window must be positive");
        }
        if self.rate_limit.window_secs == 0 {
            anyhow::bail!("rate_limit.window_secs must be positive");
        }
        if self.rate_limit.max_attempts == 0 {
            anyhow::bail!("rate_limit.max_attempts must be positive");
        }
        if self.refresh.poll_interval_secs == 0 {
            anyhow::bail!("refresh.poll_interval_secs must be positive");
        }
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!("logging.level '{other}' is not a valid level"),
        }
        Ok(())
    }
}
