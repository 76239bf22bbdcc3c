//! Extruder and bed records
//!
//! Passive data holders owned by [`PrinterState`](super::PrinterState).

use printkit_core::ExtruderSnapshot;
use serde::{Deserialize, Serialize};

/// Position and thermal state of one extruder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtruderStatus {
    id: usize,
    /// Target temperature
    pub temp_set: f64,
    /// Last read temperature
    pub temp_read: f64,
    /// Heater output, normalized across firmware families
    pub output: i32,
    /// Logical extruder position
    pub e_pos: f64,
    /// Highest logical position reached
    pub e_max: f64,
    /// Offset between logical and firmware position
    pub e_offset: f64,
    /// Logical position at the previous time estimate
    pub last_e: f64,
    /// Position as the firmware counts it
    pub e_printer: f64,
}

impl ExtruderStatus {
    /// Create a record for the extruder with the given index
    pub fn new(id: usize) -> Self {
        Self {
            id,
            temp_set: 0.0,
            temp_read: 0.0,
            output: 0,
            e_pos: 0.0,
            e_max: 0.0,
            e_offset: 0.0,
            last_e: 0.0,
            e_printer: 0.0,
        }
    }

    /// Index of this extruder
    pub fn id(&self) -> usize {
        self.id
    }

    /// Zero all position trackers
    pub fn reset_position(&mut self) {
        self.e_pos = 0.0;
        self.e_max = 0.0;
        self.e_offset = 0.0;
        self.last_e = 0.0;
        self.e_printer = 0.0;
    }

    /// Thermal part of the record
    pub fn snapshot(&self) -> ExtruderSnapshot {
        ExtruderSnapshot {
            temp_set: self.temp_set,
            temp_read: self.temp_read,
            output: self.output,
        }
    }
}

/// Thermal state of the print bed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BedStatus {
    /// Target temperature
    pub temp_set: f64,
    /// Last read temperature
    pub temp_read: f64,
    /// Heater output
    pub output: i32,
}
