//! Typed views of device API payloads
//!
//! The API speaks JSON with `status` / `control` / `about` sections per
//! device. These structs model only the fields the rest of the system
//! reads; unknown fields are ignored, and every field is optional because
//! a fail-soft fetch can come back as an empty object.

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Full status document for one device (`GET devices/{id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Live readings (temperatures, water level, connectivity)
    #[serde(default)]
    pub status: StatusInfo,
    /// Current control settings (setpoint, power, display)
    #[serde(default)]
    pub control: ControlState,
    /// Static device information (model, firmware, addresses)
    #[serde(default)]
    pub about: AboutInfo,
}

impl DeviceStatus {
    /// Returns true if the document carries no data at all
    ///
    /// This is what a fail-soft empty payload deserializes into; callers
    /// treat it as "no fresh data available" and keep their cached state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Live readings reported by the device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub water_level: Option<f64>,
    pub is_water_low: Option<bool>,
    pub is_connected: Option<bool>,
    pub water_temperature_c: Option<f64>,
    pub water_temperature_f: Option<f64>,
    pub bed_temperature_c: Option<f64>,
    pub environment_temperature_c: Option<f64>,
    pub environment_humidity: Option<f64>,
}

/// Control settings currently applied to the device
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub set_temperature_c: Option<f64>,
    pub set_temperature_f: Option<f64>,
    pub thermal_control_status: Option<PowerState>,
    pub display_temperature_unit: Option<String>,
    pub brightness_level: Option<u8>,
    pub time_zone: Option<String>,
}

/// Static device information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutInfo {
    pub model: Option<String>,
    pub firmware_version: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub ip_address: Option<String>,
    pub lan_address: Option<String>,
}

/// Thermal control power state
///
/// The API represents on/off as `active`/`standby` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    /// Thermal control running
    Active,
    /// Thermal control off
    Standby,
}

impl PowerState {
    /// Wire representation (`"active"` / `"standby"`)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Standby => "standby",
        }
    }

    /// Parse the wire representation
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "active" => Ok(Self::Active),
            "standby" => Ok(Self::Standby),
            other => Err(DomainError::InvalidPowerState(other.to_string())),
        }
    }
}

impl std::fmt::Display for PowerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry from the claimed-devices listing (`GET devices`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimedDevice {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Hardware attachments reported by the cloud (e.g. `CHILIPAD_PRO`)
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub model: Option<String>,
}
