//! Setup command - validate a token and select a device
//!
//! Mirrors the integration's first-run flow: the token is validated by
//! listing claimed devices, a device is chosen, its status is fetched for
//! type detection, and the result is written to the config file. Any
//! validation failure is returned as an error, so `thermopad setup` exits
//! nonzero when it did not produce a usable configuration.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use thermopad_api::{ApiError, DeviceClient};
use thermopad_core::domain::{DeviceId, DeviceKind};

use crate::commands::{self, build_api_client};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct SetupCommand {
    /// API bearer token from the vendor's developer portal
    #[arg(long)]
    pub token: String,

    /// Device to control; required when the token claims several devices
    #[arg(long)]
    pub device: Option<String>,

    /// Override the API base URL
    #[arg(long)]
    pub base_url: Option<String>,
}

impl SetupCommand {
    pub async fn execute(&self, format: OutputFormat, config_override: Option<&str>) -> Result<()> {
        let formatter = get_formatter(format);

        let mut config = commands::load_config(config_override);
        config.api.token = Some(self.token.clone());
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }

        let api = build_api_client(&config)?;

        // Listing claimed devices doubles as token validation.
        let devices = match api.list_claimed_devices().await {
            Ok(devices) => devices,
            Err(ApiError::AuthInvalid) => anyhow::bail!("Invalid API token"),
            Err(error) => anyhow::bail!("Cannot connect to the API: {error}"),
        };

        if devices.is_empty() {
            anyhow::bail!("No devices found for this token");
        }

        let selected = match &self.device {
            Some(wanted) => match devices.iter().find(|d| &d.id == wanted) {
                Some(device) => device,
                None => anyhow::bail!("Device '{wanted}' is not claimed by this token"),
            },
            None if devices.len() == 1 => &devices[0],
            None => {
                for device in &devices {
                    formatter.info(&format!("{}  {}", device.id, device.name));
                }
                anyhow::bail!("Multiple devices claimed; re-run with --device <id>");
            }
        };

        // Fetch status for device-type detection.
        let device_id: DeviceId = selected.id.parse()?;
        let client = DeviceClient::new(Arc::clone(&api), device_id);
        let status = client.device_status().await?;
        let kind = DeviceKind::detect(selected, Some(&status));
        let title = kind.display_title(&selected.name);

        info!(device_id = %selected.id, ?kind, "Device selected during setup");

        config.api.device_id = Some(selected.id.clone());
        let path = commands::config_path(config_override);
        config.save(&path)?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "device_id": selected.id,
                "title": title,
                "climate_control": kind.has_climate_control(),
                "config": path.display().to_string(),
            }));
        } else {
            formatter.success(&format!("Configured {title}"));
            formatter.info(&format!("Config written to {}", path.display()));
        }
        Ok(())
    }
}
