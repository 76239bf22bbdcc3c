//! Outgoing-command interpretation

use super::{MoveRecord, StateInner, X, Y, Z};
use printkit_core::{Axis, DecodedCommand, PrinterConfiguration};

/// Host directive confirming the printer sits at its home position
const IS_AT_HOME_DIRECTIVE: &str = "@isathome";

/// Minimum XYZ displacement treated as travel for time estimation
const MIN_TRAVEL: f64 = 0.001;

impl StateInner {
    pub(super) fn analyze<C: DecodedCommand + ?Sized>(
        &mut self,
        code: &C,
        config: &dyn PrinterConfiguration,
    ) -> Option<MoveRecord> {
        if let Some(directive) = code.host_command() {
            self.analyze_host_command(directive, config);
            return None;
        }

        if let Some(n) = code.line_number() {
            self.last_line = n;
        }

        if self.uploading && code.m() != Some(29) {
            return None;
        }

        if let Some(g) = code.g() {
            return self.analyze_g(g, code, config);
        }

        if let Some(m) = code.m() {
            self.analyze_m(m, code);
        } else if let Some(t) = code.t() {
            let index = self.resolve(t);
            if index != self.active {
                tracing::debug!("Tool change T{} -> extruder {}", t, index);
            }
            self.active = index;
        }

        None
    }

    fn analyze_host_command(&mut self, directive: &str, config: &dyn PrinterConfiguration) {
        match directive.split_whitespace().next() {
            Some(IS_AT_HOME_DIRECTIVE) => {
                tracing::debug!("Host confirmed printer is at home");
                self.set_is_at_home(config);
            }
            _ => tracing::trace!("Ignoring host directive '{}'", directive),
        }
    }

    fn analyze_g<C: DecodedCommand + ?Sized>(
        &mut self,
        g: u16,
        code: &C,
        config: &dyn PrinterConfiguration,
    ) -> Option<MoveRecord> {
        match g {
            0 | 1 => {
                let record = self.linear_move(code, config);
                self.last_move = Some(record);
                return Some(record);
            }
            28 | 161 => self.home(code, config, false),
            162 => self.home(code, config, true),
            90 => self.relative = false,
            91 => self.relative = true,
            92 => self.set_position(code),
            _ => {}
        }
        None
    }

    fn analyze_m<C: DecodedCommand + ?Sized>(&mut self, m: u16, code: &C) {
        match m {
            28 => {
                tracing::debug!("Upload started, ignoring commands until M29");
                self.uploading = true;
            }
            29 => {
                tracing::debug!("Upload finished");
                self.uploading = false;
            }
            80 => self.power_on = true,
            81 => self.power_on = false,
            82 => self.e_relative = false,
            83 => self.e_relative = true,
            104 | 109 => {
                let index = self.resolve(code.t().unwrap_or(-1));
                if let Some(s) = code.s() {
                    self.extruders[index].temp_set = s;
                }
            }
            106 => {
                self.fan_on = true;
                if let Some(s) = code.s() {
                    self.fan_voltage = s as i32;
                }
            }
            107 => self.fan_on = false,
            110 => self.last_line = code.line_number().unwrap_or(0),
            111 => {
                if let Some(s) = code.s() {
                    self.debug_level = s as i32;
                }
            }
            140 | 190 => {
                if let Some(s) = code.s() {
                    self.bed.temp_set = s;
                }
            }
            203 => self.temp_monitor = code.s().unwrap_or(0.0) as i32,
            _ => {}
        }
    }

    fn linear_move<C: DecodedCommand + ?Sized>(
        &mut self,
        code: &C,
        config: &dyn PrinterConfiguration,
    ) -> MoveRecord {
        let mut record = MoveRecord {
            from_x: self.pos[X],
            from_y: self.pos[Y],
            from_z: self.pos[Z],
            from_e: self.active_extruder().e_pos,
            extrusion_changed: false,
        };

        if let Some(f) = code.f() {
            self.feed_rate = f;
        }

        for axis in Axis::CARTESIAN {
            if let Some(v) = code.axis(axis) {
                let i = axis.index();
                self.pos[i] = if self.relative {
                    self.pos[i] + v
                } else {
                    self.offset[i] + v
                };
            }
        }

        if let Some(e) = code.e() {
            let relative = self.relative || self.e_relative;
            let ex = self.active_extruder_mut();
            if relative {
                record.extrusion_changed = e != 0.0;
                ex.e_pos += e;
                ex.e_printer += e;
            } else {
                let target = ex.e_offset + e;
                record.extrusion_changed = target != ex.e_pos;
                ex.e_pos = target;
                ex.e_printer = e;
            }
        }

        self.clamp_to_bounds(config);
        self.track_layer();
        self.accumulate_printing_time();
        record
    }

    fn clamp_to_bounds(&mut self, config: &dyn PrinterConfiguration) {
        for axis in Axis::CARTESIAN {
            let i = axis.index();
            let limits = config.axis_limits(axis);
            let (value, clamped) = limits.clamp(self.pos[i]);
            if clamped {
                tracing::warn!(
                    "{} {:.3} outside [{}, {}], clamped to {}; axis no longer homed",
                    axis,
                    self.pos[i],
                    limits.min,
                    limits.max,
                    value
                );
                self.pos[i] = value;
                self.homed[i] = false;
            }
        }
    }

    fn track_layer(&mut self) {
        let z = self.pos[Z];
        let ex = &mut self.extruders[self.active];
        if ex.e_pos > ex.e_max {
            ex.e_max = ex.e_pos;
            if z != self.last_z_print {
                self.last_z_print = z;
                self.layer += 1;
            }
        }
    }

    fn accumulate_printing_time(&mut self) {
        let dx = (self.pos[X] - self.last_pos[X]).abs();
        let dy = (self.pos[Y] - self.last_pos[Y]).abs();
        let dz = (self.pos[Z] - self.last_pos[Z]).abs();
        let ex = &mut self.extruders[self.active];
        let de = (ex.e_pos - ex.last_e).abs();

        if self.feed_rate > 0.0 {
            let distance = if dx + dy + dz > MIN_TRAVEL {
                (dx * dx + dy * dy + dz * dz).sqrt()
            } else {
                de
            };
            self.printing_time += distance * 60.0 / self.feed_rate;
        } else {
            tracing::warn!(
                "Feed rate {} is not positive, skipping time estimate",
                self.feed_rate
            );
        }

        self.last_pos = self.pos;
        ex.last_e = ex.e_pos;
    }

    fn home<C: DecodedCommand + ?Sized>(
        &mut self,
        code: &C,
        config: &dyn PrinterConfiguration,
        to_max: bool,
    ) {
        let home_all = !code.has_xyz();
        for axis in Axis::CARTESIAN {
            if home_all || code.axis(axis).is_some() {
                let i = axis.index();
                let limits = config.axis_limits(axis);
                self.offset[i] = 0.0;
                self.pos[i] = if to_max { limits.max } else { limits.home };
                self.homed[i] = true;
            }
        }
        tracing::debug!(
            "Homed {} to {}",
            if home_all { "all axes" } else { "selected axes" },
            if to_max { "max" } else { "home" }
        );

        if !to_max && code.e().is_some() {
            let ex = self.active_extruder_mut();
            ex.e_offset = 0.0;
            ex.e_pos = 0.0;
            ex.e_max = 0.0;
        }
    }

    fn set_position<C: DecodedCommand + ?Sized>(&mut self, code: &C) {
        for axis in Axis::CARTESIAN {
            if let Some(v) = code.axis(axis) {
                let i = axis.index();
                self.offset[i] = self.pos[i] - v;
            }
        }

        if let Some(e) = code.e() {
            let ex = self.active_extruder_mut();
            ex.e_offset = ex.e_pos - e;
            ex.last_e = ex.e_pos;
            ex.e_printer = e;
        }
    }
}
