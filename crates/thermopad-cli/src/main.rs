//! thermopad CLI - Command-line interface for thermopad
//!
//! Provides commands for:
//! - Setting up the API token and selecting a device
//! - Listing claimed devices
//! - Viewing device status
//! - Controlling temperature and power
//! - Watching status updates continuously

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{
    devices::DevicesCommand, power::PowerCommand, set_temp::SetTempCommand,
    setup::SetupCommand, status::StatusCommand, watch::WatchCommand,
};
use output::OutputFormat;

#[derive(Debug, Parser)]
#[command(name = "thermopad", version, about = "Bed climate device control from the terminal")]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate an API token and select a device
    Setup(SetupCommand),
    /// List devices claimed by the configured token
    Devices(DevicesCommand),
    /// Show the current device status
    Status(StatusCommand),
    /// Set the temperature setpoint (degrees Celsius)
    SetTemp(SetTempCommand),
    /// Switch thermal control on or off
    Power(PowerCommand),
    /// Poll status continuously and print each update
    Watch(WatchCommand),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup tracing
    let filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let config_path = cli.config.clone();

    let result = match cli.command {
        Commands::Setup(cmd) => cmd.execute(format, config_path.as_deref()).await,
        Commands::Devices(cmd) => cmd.execute(format, config_path.as_deref()).await,
        Commands::Status(cmd) => cmd.execute(format, config_path.as_deref()).await,
        Commands::SetTemp(cmd) => cmd.execute(format, config_path.as_deref()).await,
        Commands::Power(cmd) => cmd.execute(format, config_path.as_deref()).await,
        Commands::Watch(cmd) => cmd.execute(format, config_path.as_deref()).await,
    };

    // Failures exit nonzero so scripts can detect them; the message goes
    // through the formatter so JSON mode stays machine-readable.
    if let Err(error) = result {
        output::get_formatter(format).error(&format!("{error:#}"));
        std::process::exit(1);
    }
}
