//! # PrintKit Core
//!
//! Core types, traits, and configuration shared by the PrintKit crates.
//! Provides the decoded-command and printer-configuration capability sets
//! the state tracker consumes, and the snapshot model it produces.

pub mod command;
pub mod config;
pub mod data;
pub mod error;

pub use command::{CommandFields, DecodedCommand};
pub use config::{AxisLimits, PrinterConfig, PrinterConfiguration, MAX_EXTRUDER_COUNT};
pub use data::{Axis, ExtruderSnapshot, PrinterStateSnapshot};
pub use error::{ConfigError, Error, InjectionError, Result};
