//! Firmware-facing state tracking
//!
//! - `extruder`: passive per-extruder and bed records
//! - `profile`: firmware families and their unit conventions
//! - `response_parser`: `KEY:value` token scanner for status lines
//! - `printer_state`: the guarded state machine
//! - `injection`: channel for synthesized priority commands

pub mod extruder;
pub mod injection;
pub mod printer_state;
pub mod profile;
pub mod response_parser;

pub use extruder::{BedStatus, ExtruderStatus};
pub use injection::ManualCommandSink;
pub use printer_state::{
    resolve_extruder_index, FirmwareIdentity, MoveRecord, PauseRecord, PrinterState, ResponseClass,
};
pub use profile::{FirmwareFamily, FirmwareProfile};
pub use response_parser::ResponseTokens;
