//! Thermopad Refresh - periodic device status polling
//!
//! Provides the [`RefreshCoordinator`], which polls a device's status on a
//! fixed interval through the [`DeviceApi`](thermopad_core::ports::DeviceApi)
//! port and publishes snapshots to subscribers. Failed or empty polls fall
//! back to the last known good status, marked stale, so consumers always
//! have something to show.

pub mod coordinator;

pub use coordinator::{RefreshCoordinator, RefreshHandle, Snapshot};
