//! Set-temp command - change the temperature setpoint

use anyhow::Result;
use clap::Args;

use thermopad_core::domain::Celsius;

use crate::commands::{self, build_device_client};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct SetTempCommand {
    /// Target temperature in degrees Celsius (rounded to 0.5 steps)
    pub temperature: f64,
}

impl SetTempCommand {
    pub async fn execute(&self, format: OutputFormat, config_override: Option<&str>) -> Result<()> {
        let formatter = get_formatter(format);
        let config = commands::load_config(config_override);
        let client = build_device_client(&config)?;

        let target = Celsius::new(self.temperature)?;
        let control = client.set_temperature(target).await?;

        if matches!(format, OutputFormat::Json) {
            formatter.print_json(&serde_json::json!({
                "requested_c": target.value(),
                "control": control,
            }));
            return Ok(());
        }

        match control.set_temperature_c {
            Some(applied) => {
                formatter.success(&format!("Setpoint is now {applied:.1} C"));
            }
            None => {
                formatter.success(&format!("Requested setpoint {:.1} C", target.value()));
                formatter.warn("Device did not confirm the new setpoint");
            }
        }
        Ok(())
    }
}
