//! # PrintKit
//!
//! Shadow state tracking for 3D printers driven over a G-code link.
//!
//! PrintKit interprets every G-code command a host sends and every status
//! line the firmware answers with, and keeps a logical model of the printer
//! from them: position, motion modes, temperatures and session flags. It
//! never queries the hardware.
//!
//! ## Architecture
//!
//! 1. **printkit-core** - Errors, axes, decoded-command and configuration
//!    traits, snapshot data model
//! 2. **printkit-firmware** - Response tokenizer, firmware profiles and the
//!    printer state machine
//! 3. **printkit** - This facade
//!
//! ## Example
//!
//! ```no_run
//! use printkit::{CommandFields, PrinterConfig, PrinterState};
//! use std::sync::Arc;
//!
//! let state = PrinterState::new(Arc::new(PrinterConfig::default()), 0);
//! state.analyze(&CommandFields::g(28));
//! state.analyze(&CommandFields::g(1).with_x(10.0).with_f(3000.0));
//! state.analyse_response("ok T:201.3 /210.0 B:59.8 /60.0 @:64");
//! let snapshot = state.snapshot();
//! assert_eq!(snapshot.x, 10.0);
//! ```

pub use printkit_core::{command, config, data, error};
pub use printkit_firmware::firmware;

pub use printkit_core::{
    Axis, AxisLimits, CommandFields, ConfigError, DecodedCommand, Error, ExtruderSnapshot,
    InjectionError, PrinterConfig, PrinterConfiguration, PrinterStateSnapshot, Result,
};

pub use printkit_firmware::{
    resolve_extruder_index, BedStatus, ExtruderStatus, FirmwareFamily, FirmwareIdentity,
    FirmwareProfile, ManualCommandSink, MoveRecord, PauseRecord, PrinterState, ResponseClass,
    ResponseTokens,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support (INFO when unset)
/// - Thread ids and line numbers
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}

/// Initialize logging with one JSON object per event, for headless hosts
pub fn init_json_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .json();

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))
}
