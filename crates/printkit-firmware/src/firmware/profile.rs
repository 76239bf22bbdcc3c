//! Firmware families
//!
//! Firmware identifies itself with a `FIRMWARE_NAME:` token. The name is
//! matched against [`FIRMWARE_PROFILES`] by substring to pick a family, and
//! the family decides numeric unit conventions such as the heater output
//! scale. Supporting another family is a new table row.

use serde::{Deserialize, Serialize};

/// Known firmware families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FirmwareFamily {
    /// Repetier-Firmware
    Repetier,
    /// Marlin
    Marlin,
    /// Unidentified firmware
    #[default]
    Unknown,
}

impl std::fmt::Display for FirmwareFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repetier => write!(f, "Repetier"),
            Self::Marlin => write!(f, "Marlin"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Unit conventions of one firmware family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirmwareProfile {
    /// Family this profile describes
    pub family: FirmwareFamily,
    /// Substring of the reported firmware name identifying the family
    pub name_marker: &'static str,
    /// Factor applied to reported heater output (`@:` / `@n:`)
    pub heater_output_scale: i32,
}

/// Profiles checked in order; the first marker found in the name wins.
/// Marlin reports heater output on a 0-127 scale.
pub const FIRMWARE_PROFILES: &[FirmwareProfile] = &[
    FirmwareProfile {
        family: FirmwareFamily::Marlin,
        name_marker: "Marlin",
        heater_output_scale: 2,
    },
    FirmwareProfile {
        family: FirmwareFamily::Repetier,
        name_marker: "Repetier",
        heater_output_scale: 1,
    },
];

const UNKNOWN_PROFILE: FirmwareProfile = FirmwareProfile {
    family: FirmwareFamily::Unknown,
    name_marker: "",
    heater_output_scale: 1,
};

impl FirmwareFamily {
    /// Classify a reported firmware name
    pub fn classify(firmware_name: &str) -> Self {
        FIRMWARE_PROFILES
            .iter()
            .find(|p| firmware_name.contains(p.name_marker))
            .map(|p| p.family)
            .unwrap_or(FirmwareFamily::Unknown)
    }

    /// Profile for this family
    pub fn profile(&self) -> &'static FirmwareProfile {
        FIRMWARE_PROFILES
            .iter()
            .find(|p| p.family == *self)
            .unwrap_or(&UNKNOWN_PROFILE)
    }

    /// Convert a reported heater output into the common convention
    pub fn normalize_heater_output(&self, reported: i32) -> i32 {
        reported.saturating_mul(self.profile().heater_output_scale)
    }
}
