//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for the identifiers and values the rest of the
//! workspace passes around. Each newtype ensures data validity at
//! construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// DeviceId
// ============================================================================

/// Cloud-side identifier for a claimed device
///
/// Opaque to this system beyond being embedded in request paths
/// (`devices/{id}`). Must be non-empty and must not contain path
/// separators, which would change the meaning of the request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Create a DeviceId, validating the format
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::InvalidDeviceId(id));
        }
        if id.contains('/') || id.contains('?') || id.contains('#') {
            return Err(DomainError::InvalidDeviceId(id));
        }
        Ok(Self(id))
    }

    /// Get the inner string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DeviceId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ============================================================================
// Celsius
// ============================================================================

/// Minimum setpoint the pad accepts (55F)
pub const MIN_SET_TEMP_C: f64 = 12.5;
/// Maximum setpoint the pad accepts (115F)
pub const MAX_SET_TEMP_C: f64 = 46.5;

/// A temperature setpoint in degrees Celsius
///
/// The device only accepts setpoints in 0.5-degree steps, so the value is
/// rounded to the nearest half degree at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Celsius(f64);

impl Celsius {
    /// Create a setpoint, rounding to the nearest 0.5C and validating range
    pub fn new(value: f64) -> Result<Self, DomainError> {
        let rounded = round_half_up(value);
        if !(MIN_SET_TEMP_C..=MAX_SET_TEMP_C).contains(&rounded) {
            return Err(DomainError::TemperatureOutOfRange(
                value,
                MIN_SET_TEMP_C,
                MAX_SET_TEMP_C,
            ));
        }
        Ok(Self(rounded))
    }

    /// Get the inner value
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Display for Celsius {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}C", self.0)
    }
}

/// Round a temperature to the nearest 0.0 or 0.5
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}
