//! Devices command - list devices claimed by the configured token

use anyhow::Result;
use clap::Args;

use thermopad_core::domain::DeviceKind;

use crate::commands::{self, build_api_client};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct DevicesCommand {}

impl DevicesCommand {
    pub async fn execute(&self, format: OutputFormat, config_override: Option<&str>) -> Result<()> {
        let formatter = get_formatter(format);
        let config = commands::load_config(config_override);
        let api = build_api_client(&config)?;

        let devices = api.list_claimed_devices().await?;

        if matches!(format, OutputFormat::Json) {
            let entries: Vec<_> = devices
                .iter()
                .map(|device| {
                    let kind = DeviceKind::detect(device, None);
                    serde_json::json!({
                        "id": device.id,
                        "name": device.name,
                        "model": device.model,
                        "kind": format!("{kind:?}"),
                        "configured": config.api.device_id.as_deref() == Some(device.id.as_str()),
                    })
                })
                .collect();
            formatter.print_json(&serde_json::json!({ "devices": entries }));
            return Ok(());
        }

        if devices.is_empty() {
            formatter.warn("No devices claimed by this token");
            return Ok(());
        }

        for device in &devices {
            let kind = DeviceKind::detect(device, None);
            let marker = if config.api.device_id.as_deref() == Some(device.id.as_str()) {
                " (configured)"
            } else {
                ""
            };
            formatter.info(&format!(
                "{}  {}{}",
                device.id,
                kind.display_title(&device.name),
                marker
            ));
        }
        Ok(())
    }
}
