//! Device API port (driven/secondary port)
//!
//! This module defines the interface the refresh coordinator and CLI use
//! to talk to a device-control cloud. The primary implementation is the
//! HTTP adapter in `thermopad-api`; tests substitute scripted fakes.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification; callers
//!   that care about the HTTP error taxonomy can downcast to the adapter's
//!   error type.
//! - Uses `#[async_trait]` for async trait methods.
//! - A fail-soft fetch (retry budget exhausted on a transient failure)
//!   surfaces as `Ok` with an empty [`DeviceStatus`], not as an error;
//!   see `DeviceStatus::is_empty`.

use async_trait::async_trait;

use crate::domain::{Celsius, ClaimedDevice, ControlState, DeviceStatus, PowerState};

/// Interface for a device-control cloud API
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Fetch the current status document for the bound device
    async fn device_status(&self) -> anyhow::Result<DeviceStatus>;

    /// Set the temperature setpoint, returning the echoed control payload
    async fn set_temperature(&self, target: Celsius) -> anyhow::Result<ControlState>;

    /// Switch thermal control between active and standby
    async fn set_power(&self, state: PowerState) -> anyhow::Result<ControlState>;

    /// List all devices claimed by the configured token
    async fn list_claimed_devices(&self) -> anyhow::Result<Vec<ClaimedDevice>>;
}
