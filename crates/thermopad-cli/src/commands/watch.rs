//! Watch command - poll status continuously and print each update

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use thermopad_core::ports::DeviceApi;
use thermopad_refresh::RefreshCoordinator;

use crate::commands::{self, build_device_client};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Poll interval in seconds (defaults to the configured interval)
    #[arg(long)]
    pub interval: Option<u64>,
}

impl WatchCommand {
    pub async fn execute(&self, format: OutputFormat, config_override: Option<&str>) -> Result<()> {
        let formatter = get_formatter(format);
        let config = commands::load_config(config_override);
        let client = build_device_client(&config)?;

        let interval = Duration::from_secs(
            self.interval.unwrap_or(config.refresh.poll_interval_secs),
        );
        let api: Arc<dyn DeviceApi> = Arc::new(client);
        let (coordinator, handle) = RefreshCoordinator::new(api, interval);
        let mut updates = handle.subscribe();
        let worker = tokio::spawn(coordinator.run());

        formatter.info(&format!(
            "Watching device status every {}s (Ctrl-C to stop)",
            interval.as_secs()
        ));

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    debug!("Interrupt received, stopping watch");
                    break;
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = updates.borrow_and_update().clone();
                    if let Some(snapshot) = snapshot {
                        formatter.snapshot(&snapshot);
                    }
                }
            }
        }

        handle.shutdown();
        let _ = worker.await;
        Ok(())
    }
}
