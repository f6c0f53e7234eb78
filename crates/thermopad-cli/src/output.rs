//! CLI output rendering
//!
//! Commands emit either human-readable lines or JSON documents depending
//! on the global `--json` flag. The formatter owns the rendering of the
//! domain values the commands display (status documents, watch
//! snapshots), so command modules only decide what to show.

use serde_json::{json, Value};

use thermopad_core::domain::DeviceStatus;
use thermopad_refresh::Snapshot;

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Renders command results for one output format
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &Value);

    /// Renders a full device status document
    fn device_status(&self, device_id: &str, doc: &DeviceStatus);

    /// Renders one watch snapshot
    fn snapshot(&self, snapshot: &Snapshot);
}

/// Human-readable output with checkmarks and aligned fields
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {message}");
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {message}");
    }
    fn warn(&self, message: &str) {
        eprintln!("\u{26a0} Warning: {message}");
    }
    fn info(&self, message: &str) {
        println!("  {message}");
    }
    fn print_json(&self, _value: &Value) {
        // Human formatter doesn't print JSON
    }
    fn device_status(&self, device_id: &str, doc: &DeviceStatus) {
        self.success(&format!("Device {device_id}"));
        for line in status_lines(doc) {
            self.info(&line);
        }
        if doc.status.is_water_low == Some(true) {
            self.warn("Water level is low");
        }
    }
    fn snapshot(&self, snapshot: &Snapshot) {
        self.info(&snapshot_line(snapshot));
    }
}

/// JSON output, one document per invocation on stdout
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!("{}", json!({"success": true, "message": message}));
    }
    fn error(&self, message: &str) {
        eprintln!("{}", json!({"success": false, "error": message}));
    }
    fn warn(&self, message: &str) {
        eprintln!("{}", json!({"level": "warning", "message": message}));
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &Value) {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_default()
        );
    }
    fn device_status(&self, _device_id: &str, doc: &DeviceStatus) {
        self.print_json(&serde_json::to_value(doc).unwrap_or_default());
    }
    fn snapshot(&self, snapshot: &Snapshot) {
        self.print_json(&snapshot_json(snapshot));
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Human => Box::new(HumanFormatter),
    }
}

/// One field line per populated status field, in display order
fn status_lines(doc: &DeviceStatus) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(power) = doc.control.thermal_control_status {
        lines.push(format!("Power:          {power}"));
    }
    if let Some(target) = doc.control.set_temperature_c {
        lines.push(format!("Setpoint:       {target:.1} C"));
    }
    if let Some(water) = doc.status.water_temperature_c {
        lines.push(format!("Water temp:     {water:.1} C"));
    }
    if let Some(bed) = doc.status.bed_temperature_c {
        lines.push(format!("Bed temp:       {bed:.1} C"));
    }
    if let Some(level) = doc.status.water_level {
        lines.push(format!("Water level:    {level:.0}%"));
    }
    if let Some(connected) = doc.status.is_connected {
        lines.push(format!(
            "Connectivity:   {}",
            if connected { "connected" } else { "offline" }
        ));
    }
    if let Some(firmware) = &doc.about.firmware_version {
        lines.push(format!("Firmware:       {firmware}"));
    }
    lines
}

/// One-line summary of a watch snapshot; missing fields render as `-`
fn snapshot_line(snapshot: &Snapshot) -> String {
    let temp = |value: Option<f64>| {
        value
            .map(|t| format!("{t:.1} C"))
            .unwrap_or_else(|| "-".to_string())
    };
    let power = snapshot
        .status
        .control
        .thermal_control_status
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "[{}] power={} setpoint={} water={}{}",
        snapshot.fetched_at.format("%H:%M:%S"),
        power,
        temp(snapshot.status.control.set_temperature_c),
        temp(snapshot.status.status.water_temperature_c),
        if snapshot.stale { " (stale)" } else { "" }
    )
}

/// JSON document for a watch snapshot
fn snapshot_json(snapshot: &Snapshot) -> Value {
    json!({
        "fetched_at": snapshot.fetched_at.to_rfc3339(),
        "stale": snapshot.stale,
        "status": snapshot.status,
    })
}
