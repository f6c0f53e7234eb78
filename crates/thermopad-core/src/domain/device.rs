//! Device-type detection
//!
//! The cloud exposes both climate pads and sleep trackers through the same
//! account listing. The kind decides which capabilities the rest of the
//! system offers for a device (climate control vs. tracking sensors).
//! Detection is heuristic: the attachments list is authoritative when
//! present, otherwise the model number prefix decides.

use tracing::warn;

use super::status::{ClaimedDevice, DeviceStatus};

/// Attachment value identifying a climate pad in the device listing
const CHILIPAD_ATTACHMENT: &str = "CHILIPAD_PRO";

/// What kind of hardware a claimed device is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Bed climate pad (Dock Pro / ChiliPad, model prefix `DP`)
    SleepPad,
    /// Standalone sleep tracker (model prefix `ST`)
    SleepTracker,
}

impl DeviceKind {
    /// Detect the device kind from the listing entry and, if available,
    /// the status document.
    ///
    /// Order of precedence:
    /// 1. `CHILIPAD_PRO` in the attachments list
    /// 2. Model prefix from the status document (`about.model`), falling
    ///    back to the model field in the listing entry
    /// 3. Default to [`DeviceKind::SleepPad`] with a warning
    #[must_use]
    pub fn detect(device: &ClaimedDevice, status: Option<&DeviceStatus>) -> Self {
        if device
            .attachments
            .iter()
            .any(|a| a == CHILIPAD_ATTACHMENT)
        {
            return Self::SleepPad;
        }

        let model = status
            .and_then(|s| s.about.model.as_deref())
            .or(device.model.as_deref());

        match model {
            Some(m) if m.starts_with("DP") => Self::SleepPad,
            Some(m) if m.starts_with("ST") => Self::SleepTracker,
            _ => {
                warn!(
                    device_id = %device.id,
                    model = ?model,
                    "Could not determine device kind, defaulting to sleep pad"
                );
                Self::SleepPad
            }
        }
    }

    /// Title shown to users for a device of this kind
    #[must_use]
    pub fn display_title(&self, name: &str) -> String {
        match self {
            Self::SleepPad => format!("ChiliPad Pro {name}"),
            Self::SleepTracker => format!("Sleep Tracker {name}"),
        }
    }

    /// Whether this kind accepts temperature/power control commands
    #[must_use]
    pub fn has_climate_control(&self) -> bool {
        matches!(self, Self::SleepPad)
    }

    /// Whether this kind reports sleep-tracking readings
    #[must_use]
    pub fn has_sleep_tracking(&self) -> bool {
        matches!(self, Self::SleepTracker)
    }
}
