//! Power command - switch thermal control on or off

use anyhow::Result;
use clap::{Args, ValueEnum};

use thermopad_core::domain::PowerState;

use crate::commands::{self, build_device_client};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PowerArg {
    On,
    Off,
}

impl From<PowerArg> for PowerState {
    fn from(arg: PowerArg) -> Self {
        match arg {
            PowerArg::On => PowerState::Active,
            PowerArg::Off => PowerState::Standby,
        }
    }
}

#[derive(Debug, Args)]
pub struct PowerCommand {
    /// Desired state
    #[arg(value_enum)]
    pub state: PowerArg,
}

impl PowerCommand {
    pub async fn execute(&self, format: OutputFormat, config_override: Option<&str>) -> Result<()> {
        let formatter = get_formatter(format);
        let config = commands::load_config(config_override);
        let client = build_device_client(&config)?;

        let wanted: PowerState = self.state.into();
        let control = client.set_power(wanted).await?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "requested": wanted.as_str(),
                "control": control,
            }));
            return Ok(());
        }

        match control.thermal_control_status {
            Some(applied) => formatter.success(&format!("Thermal control is now {applied}")),
            None => {
                formatter.success(&format!("Requested thermal control {wanted}"));
                formatter.warn("Device did not confirm the new power state");
            }
        }
        Ok(())
    }
}
