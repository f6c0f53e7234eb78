//! Port definitions (trait interfaces for adapters)

pub mod device_api;

pub use device_api::DeviceApi;
