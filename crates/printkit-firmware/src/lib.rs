//! # PrintKit Firmware
//!
//! Shadow interpretation of the G-code link to one 3D printer.
//! Tracks position, motion modes, temperatures and session flags by
//! interpreting every outgoing command and every incoming firmware line,
//! without querying the hardware.

pub mod firmware;

pub use firmware::{
    resolve_extruder_index, BedStatus, ExtruderStatus, FirmwareFamily, FirmwareIdentity,
    FirmwareProfile, ManualCommandSink, MoveRecord, PauseRecord, PrinterState, ResponseClass,
    ResponseTokens,
};
