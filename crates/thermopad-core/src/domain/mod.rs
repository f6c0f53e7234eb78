//! Domain types for thermopad
//!
//! This module contains the core domain types:
//! - `DeviceStatus` and friends - typed views of API payloads
//! - `DeviceKind` - device-type detection and capability flags
//! - Newtypes - validated wrappers for identifiers and temperatures
//! - `DomainError` - validation failures

pub mod device;
pub mod errors;
pub mod newtypes;
pub mod status;

pub use device::DeviceKind;
pub use errors::DomainError;
pub use newtypes::{Celsius, DeviceId};
pub use status::{AboutInfo, ClaimedDevice, ControlState, DeviceStatus, PowerState, StatusInfo};
