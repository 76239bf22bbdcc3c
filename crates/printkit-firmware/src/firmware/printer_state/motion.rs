//! Pause/resume capture and jog command synthesis

use super::{StateInner, X, Y, Z};
use printkit_core::{Axis, PrinterConfiguration};
use serde::{Deserialize, Serialize};

/// Position and motion mode captured when a print is paused
///
/// Coordinates are in firmware terms (logical minus offset), ready to be
/// sent back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PauseRecord {
    /// X at pause time
    pub x: f64,
    /// Y at pause time
    pub y: f64,
    /// Z at pause time
    pub z: f64,
    /// Active extruder position at pause time
    pub e: f64,
    /// Feed rate at pause time
    pub feed_rate: f64,
    /// Whether positioning was relative at pause time
    pub relative: bool,
}

impl StateInner {
    pub(super) fn store_pause(&mut self) -> PauseRecord {
        let ex = self.active_extruder();
        let record = PauseRecord {
            x: self.pos[X] - self.offset[X],
            y: self.pos[Y] - self.offset[Y],
            z: self.pos[Z] - self.offset[Z],
            e: ex.e_pos - ex.e_offset,
            feed_rate: self.feed_rate,
            relative: self.relative,
        };
        tracing::debug!(
            "Pause captured at X{:.2} Y{:.2} Z{:.2} E{:.4}",
            record.x,
            record.y,
            record.z,
            record.e
        );
        self.pause = Some(record);
        record
    }

    /// Position is restored before the motion mode, so a relative move
    /// issued after the resume starts from the right base. The sequence
    /// itself switches to absolute positioning, so only a relative capture
    /// needs a mode line.
    pub(super) fn resume_commands(&self, config: &dyn PrinterConfiguration) -> Vec<String> {
        let Some(pause) = self.pause else {
            tracing::warn!("Resume requested without a captured pause");
            return Vec::new();
        };

        let mut commands = vec![
            "G90".to_string(),
            format!(
                "G1 X{:.2} Y{:.2} F{:.0}",
                pause.x,
                pause.y,
                config.xy_jog_speed() * 60.0
            ),
            format!("G1 Z{:.2} F{:.0}", pause.z, config.z_jog_speed() * 60.0),
            format!("G92 E{:.4}", pause.e),
        ];
        if pause.relative {
            commands.push("G91".to_string());
        }
        commands.push(format!("G1 F{:.0}", pause.feed_rate));
        commands
    }

    pub(super) fn move_command(&self, axis: Axis, delta: f64, feed_rate: f64) -> String {
        let value = match axis {
            Axis::E if self.relative || self.e_relative => delta,
            Axis::E => self.active_extruder().e_printer + delta,
            _ if self.relative => delta,
            _ => {
                let i = axis.index();
                self.pos[i] - self.offset[i] + delta
            }
        };
        format!("G1 {}{:.2} F{:.0}", axis.letter(), value, feed_rate)
    }
}
