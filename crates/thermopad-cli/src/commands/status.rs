//! Status command - show the configured device's current state

use anyhow::Result;
use clap::Args;

use crate::commands::{self, build_device_client};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(&self, format: OutputFormat, config_override: Option<&str>) -> Result<()> {
        let formatter = get_formatter(format);
        let config = commands::load_config(config_override);
        let client = build_device_client(&config)?;

        let status = client.device_status().await?;

        if status.is_empty() {
            formatter.warn("No fresh status available from the API");
            return Ok(());
        }

        formatter.device_status(client.device_id().as_str(), &status);
        Ok(())
    }
}
