//! Firmware line interpretation

use super::{ResponseClass, StateInner};
use crate::firmware::profile::FirmwareFamily;
use crate::firmware::response_parser::ResponseTokens;
use printkit_core::Axis;
use std::time::Instant;

impl StateInner {
    pub(super) fn analyse_response(&mut self, line: &str) -> ResponseClass {
        let tokens = ResponseTokens::scan(line);
        let mut class = ResponseClass::Unclassified;

        if let Some(name) = tokens.get("FIRMWARE_NAME") {
            self.identify_firmware(name, &tokens);
        }

        for axis in Axis::CARTESIAN {
            if let Some(reported) = tokens.number(&axis.letter().to_string()) {
                let i = axis.index();
                self.pos[i] = reported + self.offset[i];
            }
        }

        if let Some(e) = tokens.number("E") {
            self.active_extruder_mut().e_pos = e;
        }

        if tokens.contains("T0") {
            self.read_indexed_temperatures(&tokens);
        }

        if let Some(temp) = tokens.number("T") {
            class = ResponseClass::Telemetry;
            let family = self.firmware.family;
            let ex = self.active_extruder_mut();
            ex.temp_read = temp;
            if let Some(output) = tokens.integer("@") {
                ex.output = family.normalize_heater_output(output);
            }
            self.last_temperature_update = Some(Instant::now());
        }

        if let Some(temp) = tokens.number("B") {
            self.bed.temp_read = temp;
        }

        if let Some(speed) = tokens.integer("SpeedMultiply") {
            class = ResponseClass::Telemetry;
            self.speed_multiply = speed;
        }

        if let Some(flow) = tokens.integer("FlowMultiply") {
            class = ResponseClass::Telemetry;
            self.flow_multiply = flow;
        }

        if let Some(target) = tokens.number("TargetExtr0") {
            class = ResponseClass::Telemetry;
            let slot = self.resolve(0);
            self.extruders[slot].temp_set = target;
        }

        // Firmware echoes the second extruder's target as TargetExtr1, but it
        // has always been folded into extruder 0. Kept until confirmed.
        if let Some(target) = tokens.number("TargetExtr1") {
            class = ResponseClass::Telemetry;
            let slot = self.resolve(0);
            self.extruders[slot].temp_set = target;
        }

        if let Some(target) = tokens.number("TargetBed") {
            class = ResponseClass::Telemetry;
            self.bed.temp_set = target;
        }

        if let Some(fan) = tokens.integer("Fanspeed") {
            class = ResponseClass::Telemetry;
            self.fan_voltage = fan;
        }

        if let Some(version) = tokens.integer("REPETIER_PROTOCOL") {
            self.binary_version = version;
        }

        class
    }

    fn identify_firmware(&mut self, name: &str, tokens: &ResponseTokens<'_>) {
        let family = FirmwareFamily::classify(name);
        self.firmware.name = name.to_string();
        self.firmware.family = family;

        if let Some(url) = tokens.get("FIRMWARE_URL") {
            self.firmware.url = url.to_string();
        }
        if let Some(protocol) = tokens.get("PROTOCOL_VERSION") {
            self.firmware.protocol_version = protocol.to_string();
        }
        if let Some(machine) = tokens.get("MACHINE_TYPE") {
            self.firmware.machine_type = machine.to_string();
        }
        if let Some(count) = tokens.integer("EXTRUDER_COUNT") {
            self.firmware.extruder_count = count;
        }

        tracing::info!(
            "Firmware identified: {} ({}), {} extruder(s) reported",
            name,
            family,
            self.firmware.extruder_count
        );
    }

    /// `T0:`, `T1:`, ... until the first missing index, each with an
    /// optional `@n:` heater output.
    fn read_indexed_temperatures(&mut self, tokens: &ResponseTokens<'_>) {
        let family = self.firmware.family;
        for index in 0.. {
            let key = format!("T{}", index);
            if !tokens.contains(&key) {
                break;
            }
            let slot = self.resolve(index);
            let ex = &mut self.extruders[slot];
            if let Some(temp) = tokens.number(&key) {
                ex.temp_read = temp;
            }
            if let Some(output) = tokens.integer(&format!("@{}", index)) {
                ex.output = family.normalize_heater_output(output);
            }
        }
    }
}
