//! Printer state machine
//!
//! [`PrinterState`] keeps the authoritative logical model of one printer:
//! position, motion modes, temperatures and session flags. Three actors
//! share it: the sender calls [`PrinterState::analyze`] before transmitting
//! each command, the reader calls [`PrinterState::analyse_response`] for each
//! received line, and query/jog callers take snapshots or request
//! synthesized commands. A single mutex totally orders all of them; callers
//! only ever receive copies of the state.
//!
//! Coordinates are logical: an absolute move to `v` lands at `offset + v`,
//! and the firmware reports `logical - offset` back. `G92` changes the offset,
//! never the logical position.

mod analyze;
mod motion;
mod response;

use crate::firmware::extruder::{BedStatus, ExtruderStatus};
use crate::firmware::injection::ManualCommandSink;
use crate::firmware::profile::FirmwareFamily;
use parking_lot::Mutex;
use printkit_core::{
    Axis, DecodedCommand, InjectionError, PrinterConfiguration, PrinterStateSnapshot,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

pub use motion::PauseRecord;

const X: usize = 0;
const Y: usize = 1;
const Z: usize = 2;

/// Resolve an extruder selector to a slot index
///
/// Negative selectors mean "the active extruder"; selectors at or beyond
/// `slot_count` fall back to slot 0 instead of failing, so malformed or
/// unsolicited selectors from firmware or UI never abort anything.
pub fn resolve_extruder_index(selector: i32, active: usize, slot_count: usize) -> usize {
    if selector < 0 {
        active
    } else if selector as usize >= slot_count {
        tracing::debug!(
            "Extruder selector {} out of range ({} slots), using extruder 0",
            selector,
            slot_count
        );
        0
    } else {
        selector as usize
    }
}

/// Classification of a firmware line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseClass {
    /// Nothing marks the line as telemetry; the caller keeps its own
    /// classification (acknowledgement, echo, ...)
    #[default]
    Unclassified,
    /// Asynchronous temperature/multiplier/target telemetry
    Telemetry,
}

/// Effect of one linear move
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveRecord {
    /// X before the move
    pub from_x: f64,
    /// Y before the move
    pub from_y: f64,
    /// Z before the move
    pub from_z: f64,
    /// Active extruder position before the move
    pub from_e: f64,
    /// Whether the command changed the extruder position
    pub extrusion_changed: bool,
}

/// Identity the firmware reported about itself
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FirmwareIdentity {
    /// Firmware name
    pub name: String,
    /// Firmware URL
    pub url: String,
    /// Protocol version
    pub protocol_version: String,
    /// Machine type
    pub machine_type: String,
    /// Extruder count the firmware reports
    pub extruder_count: i32,
    /// Family derived from the name
    pub family: FirmwareFamily,
}

#[derive(Debug, Clone)]
pub(crate) struct StateInner {
    extruders: Vec<ExtruderStatus>,
    active: usize,
    bed: BedStatus,
    pos: [f64; 3],
    offset: [f64; 3],
    last_pos: [f64; 3],
    homed: [bool; 3],
    feed_rate: f64,
    relative: bool,
    e_relative: bool,
    fan_on: bool,
    fan_voltage: i32,
    power_on: bool,
    debug_level: i32,
    uploading: bool,
    last_line: u32,
    layer: u32,
    last_z_print: f64,
    printing_time: f64,
    firmware: FirmwareIdentity,
    temp_monitor: i32,
    binary_version: i32,
    sdcard_mounted: bool,
    speed_multiply: i32,
    flow_multiply: i32,
    pause: Option<PauseRecord>,
    last_move: Option<MoveRecord>,
    last_temperature_update: Option<Instant>,
}

impl StateInner {
    fn new(slot_count: usize) -> Self {
        let mut inner = Self {
            extruders: (0..slot_count).map(ExtruderStatus::new).collect(),
            active: 0,
            bed: BedStatus::default(),
            pos: [0.0; 3],
            offset: [0.0; 3],
            last_pos: [0.0; 3],
            homed: [false; 3],
            feed_rate: 1000.0,
            relative: false,
            e_relative: false,
            fan_on: false,
            fan_voltage: 0,
            power_on: true,
            debug_level: 6,
            uploading: false,
            last_line: 0,
            layer: 0,
            last_z_print: 0.0,
            printing_time: 0.0,
            firmware: FirmwareIdentity::default(),
            temp_monitor: -1,
            binary_version: 0,
            sdcard_mounted: true,
            speed_multiply: 100,
            flow_multiply: 100,
            pause: None,
            last_move: None,
            last_temperature_update: None,
        };
        inner.reset();
        inner
    }

    fn reset(&mut self) {
        for ex in &mut self.extruders {
            ex.reset_position();
        }
        self.active = 0;
        self.uploading = false;
        self.bed = BedStatus::default();
        self.pos = [0.0; 3];
        self.offset = [0.0; 3];
        self.last_pos = [0.0; 3];
        self.homed = [false; 3];
        self.feed_rate = 1000.0;
        self.fan_on = false;
        self.fan_voltage = 0;
        self.power_on = true;
        self.relative = false;
        self.e_relative = false;
        self.debug_level = 6;
        self.last_line = 0;
        self.last_z_print = 0.0;
        self.printing_time = 0.0;
        self.layer = 0;
        self.temp_monitor = -1;
        self.binary_version = 0;
        self.sdcard_mounted = true;
        self.firmware.family = FirmwareFamily::Unknown;
        self.speed_multiply = 100;
        self.flow_multiply = 100;
        self.pause = None;
        self.last_move = None;
    }

    fn resolve(&self, selector: i32) -> usize {
        resolve_extruder_index(selector, self.active, self.extruders.len())
    }

    fn active_extruder(&self) -> &ExtruderStatus {
        &self.extruders[self.active]
    }

    fn active_extruder_mut(&mut self) -> &mut ExtruderStatus {
        &mut self.extruders[self.active]
    }

    fn set_is_at_home(&mut self, config: &dyn PrinterConfiguration) {
        for axis in Axis::CARTESIAN {
            let i = axis.index();
            self.homed[i] = true;
            self.pos[i] = config.axis_limits(axis).home;
            self.offset[i] = 0.0;
        }
    }

    fn snapshot(&self, config: &dyn PrinterConfiguration) -> PrinterStateSnapshot {
        let count = config.extruder_count();
        PrinterStateSnapshot {
            active_extruder: self.active,
            x: self.pos[X],
            y: self.pos[Y],
            z: self.pos[Z],
            feed_rate: self.feed_rate,
            fan_on: self.fan_on,
            fan_voltage: self.fan_voltage,
            power_on: self.power_on,
            debug_level: self.debug_level,
            has_x_home: self.homed[X],
            has_y_home: self.homed[Y],
            has_z_home: self.homed[Z],
            layer: self.layer,
            sdcard_mounted: self.sdcard_mounted,
            bed_temp_set: self.bed.temp_set,
            bed_temp_read: self.bed.temp_read,
            speed_multiply: self.speed_multiply,
            flow_multiply: self.flow_multiply,
            num_extruder: count,
            firmware: self.firmware.name.clone(),
            firmware_url: self.firmware.url.clone(),
            extruder: self
                .extruders
                .iter()
                .take(count)
                .map(ExtruderStatus::snapshot)
                .collect(),
        }
    }
}

/// Guarded logical model of one printer
pub struct PrinterState {
    config: Arc<dyn PrinterConfiguration>,
    inner: Mutex<StateInner>,
}

impl PrinterState {
    /// Create the state for a printer
    ///
    /// Allocates one extruder slot more than configured, so a valid slot
    /// exists even on printers reporting no extruder, and at least
    /// `min_extruder_slots` slots overall.
    pub fn new(config: Arc<dyn PrinterConfiguration>, min_extruder_slots: usize) -> Self {
        let slot_count = config
            .extruder_count()
            .saturating_add(1)
            .max(min_extruder_slots)
            .max(1);
        Self {
            inner: Mutex::new(StateInner::new(slot_count)),
            config,
        }
    }

    /// Reinitialize all mutable fields to their defaults (connect/reconnect)
    pub fn reset(&self) {
        self.inner.lock().reset();
        tracing::debug!("Printer state reset");
    }

    /// Fold the effect of one outgoing command into the state
    ///
    /// Must be called exactly once per command, in transmission order.
    /// Returns the move record for linear moves.
    pub fn analyze<C: DecodedCommand + ?Sized>(&self, code: &C) -> Option<MoveRecord> {
        self.inner.lock().analyze(code, self.config.as_ref())
    }

    /// Fold one firmware line into the state
    pub fn analyse_response(&self, line: &str) -> ResponseClass {
        self.inner.lock().analyse_response(line)
    }

    /// Increment and return the last line number
    pub fn increase_last_line(&self) -> u32 {
        let mut inner = self.inner.lock();
        inner.last_line = inner.last_line.saturating_add(1);
        inner.last_line
    }

    /// Decrement and return the last line number
    pub fn decrease_last_line(&self) -> u32 {
        let mut inner = self.inner.lock();
        inner.last_line = inner.last_line.saturating_sub(1);
        inner.last_line
    }

    /// Last line number seen or assigned
    pub fn last_line(&self) -> u32 {
        self.inner.lock().last_line
    }

    /// Mark all axes homed at the configured home position
    pub fn set_is_at_home(&self) {
        self.inner.lock().set_is_at_home(self.config.as_ref());
    }

    /// Structured copy of the exported state
    pub fn snapshot(&self) -> PrinterStateSnapshot {
        self.inner.lock().snapshot(self.config.as_ref())
    }

    /// Copy of the extruder a selector resolves to
    pub fn extruder(&self, selector: i32) -> ExtruderStatus {
        let inner = self.inner.lock();
        inner.extruders[inner.resolve(selector)].clone()
    }

    /// Index of the active extruder
    pub fn active_extruder_index(&self) -> usize {
        self.inner.lock().active
    }

    /// Number of extruder slots
    pub fn extruder_slot_count(&self) -> usize {
        self.inner.lock().extruders.len()
    }

    /// Copy of the bed record
    pub fn bed(&self) -> BedStatus {
        self.inner.lock().bed
    }

    /// Logical X/Y/Z position
    pub fn position(&self) -> (f64, f64, f64) {
        let inner = self.inner.lock();
        (inner.pos[X], inner.pos[Y], inner.pos[Z])
    }

    /// Offset of one axis; for E, the active extruder's offset
    pub fn offset(&self, axis: Axis) -> f64 {
        let inner = self.inner.lock();
        match axis {
            Axis::E => inner.active_extruder().e_offset,
            _ => inner.offset[axis.index()],
        }
    }

    /// Homed flag of a Cartesian axis
    pub fn is_homed(&self, axis: Axis) -> bool {
        match axis {
            Axis::E => false,
            _ => self.inner.lock().homed[axis.index()],
        }
    }

    /// Current feed rate (units per minute)
    pub fn feed_rate(&self) -> f64 {
        self.inner.lock().feed_rate
    }

    /// Whether positioning is relative (G91)
    pub fn is_relative(&self) -> bool {
        self.inner.lock().relative
    }

    /// Whether the extruder is independently relative (M83)
    pub fn is_extruder_relative(&self) -> bool {
        self.inner.lock().e_relative
    }

    /// Whether a file upload is in progress
    pub fn is_uploading(&self) -> bool {
        self.inner.lock().uploading
    }

    /// Printed layer count
    pub fn layer(&self) -> u32 {
        self.inner.lock().layer
    }

    /// Estimated printing time accumulated so far, in seconds
    pub fn printing_time(&self) -> f64 {
        self.inner.lock().printing_time
    }

    /// Identity the firmware reported
    pub fn firmware(&self) -> FirmwareIdentity {
        self.inner.lock().firmware.clone()
    }

    /// Family of the connected firmware
    pub fn firmware_family(&self) -> FirmwareFamily {
        self.inner.lock().firmware.family
    }

    /// Binary protocol version reported by the firmware
    pub fn binary_version(&self) -> i32 {
        self.inner.lock().binary_version
    }

    /// Extruder index selected for temperature monitoring (-1 = none)
    pub fn temp_monitor(&self) -> i32 {
        self.inner.lock().temp_monitor
    }

    /// Speed and flow multipliers in percent
    pub fn multipliers(&self) -> (i32, i32) {
        let inner = self.inner.lock();
        (inner.speed_multiply, inner.flow_multiply)
    }

    /// Most recent linear move
    pub fn last_move(&self) -> Option<MoveRecord> {
        self.inner.lock().last_move
    }

    /// When the firmware last reported the active extruder temperature
    pub fn last_temperature_update(&self) -> Option<Instant> {
        self.inner.lock().last_temperature_update
    }

    /// Captured pause record, if any
    pub fn pause_record(&self) -> Option<PauseRecord> {
        self.inner.lock().pause
    }

    /// Capture position, feed rate and positioning mode for a later resume
    ///
    /// Call while command execution is held at a safe point.
    pub fn store_pause(&self) -> PauseRecord {
        self.inner.lock().store_pause()
    }

    /// Commands restoring the captured pause state, in transmission order
    pub fn resume_commands(&self) -> Vec<String> {
        self.inner.lock().resume_commands(self.config.as_ref())
    }

    /// Inject the resume sequence into the manual-command channel
    ///
    /// Stops at the first command the channel rejects.
    pub fn inject_unpause(&self, sink: &dyn ManualCommandSink) -> Result<(), InjectionError> {
        let commands = self.resume_commands();
        tracing::info!("Resuming from pause with {} commands", commands.len());
        for command in &commands {
            sink.inject_manual_command(command)?;
        }
        Ok(())
    }

    /// Linear move command for one axis by `delta` at `feed_rate`
    pub fn move_command(&self, axis: Axis, delta: f64, feed_rate: f64) -> String {
        self.inner.lock().move_command(axis, delta, feed_rate)
    }

    /// Jog X by `dx`
    pub fn move_x_command(&self, dx: f64, feed_rate: f64) -> String {
        self.move_command(Axis::X, dx, feed_rate)
    }

    /// Jog Y by `dy`
    pub fn move_y_command(&self, dy: f64, feed_rate: f64) -> String {
        self.move_command(Axis::Y, dy, feed_rate)
    }

    /// Jog Z by `dz`
    pub fn move_z_command(&self, dz: f64, feed_rate: f64) -> String {
        self.move_command(Axis::Z, dz, feed_rate)
    }

    /// Extrude or retract by `de`
    pub fn move_e_command(&self, de: f64, feed_rate: f64) -> String {
        self.move_command(Axis::E, de, feed_rate)
    }
}

impl std::fmt::Debug for PrinterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrinterState")
            .field("inner", &*self.inner.lock())
            .finish_non_exhaustive()
    }
}
