//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! mostly validation failures at newtype construction.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid device identifier format
    #[error("Invalid device id: {0}")]
    InvalidDeviceId(String),

    /// Temperature outside the range the device accepts
    #[error("Temperature out of range: {0}C (expected {1}C to {2}C)")]
    TemperatureOutOfRange(f64, f64, f64),

    /// Invalid power state string
    #[error("Invalid power state: {0} (expected 'active' or 'standby')")]
    InvalidPowerState(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
