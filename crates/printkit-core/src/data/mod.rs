//! Data models for axes and printer-state snapshots
//!
//! This module provides:
//! - The axis vocabulary shared by configuration and the state tracker
//! - The structured snapshot exported to query callers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Printer axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
    /// Extruder axis
    E,
}

impl Axis {
    /// The three Cartesian axes in order
    pub const CARTESIAN: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis in X, Y, Z, E order
    pub fn index(&self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::E => 3,
        }
    }

    /// G-code letter for this axis
    pub fn letter(&self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::E => 'E',
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Thermal state of one extruder as exported in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtruderSnapshot {
    /// Target temperature
    pub temp_set: f64,
    /// Last read temperature
    pub temp_read: f64,
    /// Heater output (firmware-normalized)
    pub output: i32,
}

/// Point-in-time copy of the tracked printer state
///
/// Encoding this into a wire format is the caller's concern; field names
/// serialize in camelCase for JSON consumers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterStateSnapshot {
    /// Index of the active extruder
    pub active_extruder: usize,
    /// Logical X position
    pub x: f64,
    /// Logical Y position
    pub y: f64,
    /// Logical Z position
    pub z: f64,
    /// Current feed rate (units per minute)
    pub feed_rate: f64,
    /// Fan switched on
    pub fan_on: bool,
    /// Fan PWM level
    pub fan_voltage: i32,
    /// Printer power supply on
    pub power_on: bool,
    /// Firmware debug level
    pub debug_level: i32,
    /// X axis homed
    pub has_x_home: bool,
    /// Y axis homed
    pub has_y_home: bool,
    /// Z axis homed
    pub has_z_home: bool,
    /// Printed layer count
    pub layer: u32,
    /// SD card mounted
    pub sdcard_mounted: bool,
    /// Bed target temperature
    pub bed_temp_set: f64,
    /// Bed read temperature
    pub bed_temp_read: f64,
    /// Speed multiplier in percent
    pub speed_multiply: i32,
    /// Flow multiplier in percent
    pub flow_multiply: i32,
    /// Configured extruder count
    pub num_extruder: usize,
    /// Firmware name
    pub firmware: String,
    /// Firmware URL
    pub firmware_url: String,
    /// Per-extruder thermal state, one entry per configured extruder
    pub extruder: Vec<ExtruderSnapshot>,
}

impl PrinterStateSnapshot {
    /// Whether every Cartesian axis is homed
    pub fn is_fully_homed(&self) -> bool {
        self.has_x_home && self.has_y_home && self.has_z_home
    }
}
