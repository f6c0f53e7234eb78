//! CLI command implementations
//!
//! Each command is a clap `Args` struct with an `execute(format, config)`
//! method. Shared plumbing for loading configuration and constructing
//! clients lives here.

pub mod devices;
pub mod power;
pub mod set_temp;
pub mod setup;
pub mod status;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use thermopad_api::{ApiClient, DeviceClient};
use thermopad_core::config::Config;
use thermopad_core::domain::DeviceId;

/// Resolves the config file path, preferring an explicit `--config`
pub fn config_path(override_path: Option<&str>) -> PathBuf {
    match override_path {
        Some(path) => PathBuf::from(path),
        None => Config::default_path(),
    }
}

/// Loads configuration, falling back to defaults when the file is missing
pub fn load_config(override_path: Option<&str>) -> Config {
    Config::load_or_default(&config_path(override_path))
}

/// Builds an [`ApiClient`] from configuration
pub fn build_api_client(config: &Config) -> Result<Arc<ApiClient>> {
    Ok(Arc::new(ApiClient::from_config(config)?))
}

/// Builds a [`DeviceClient`] for the configured device
pub fn build_device_client(config: &Config) -> Result<DeviceClient> {
    let api = build_api_client(config)?;
    let device_id = config
        .api
        .device_id
        .as_deref()
        .context("No device configured; run 'thermopad setup' first")?;
    let device_id: DeviceId = device_id.parse()?;
    Ok(DeviceClient::new(api, device_id))
}
