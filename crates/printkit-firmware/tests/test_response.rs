use printkit_core::{Axis, CommandFields, PrinterConfig};
use printkit_firmware::{FirmwareFamily, PrinterState, ResponseClass};
use std::sync::Arc;

fn printer(extruders: usize) -> PrinterState {
    let config = PrinterConfig::default().with_extruder_count(extruders);
    PrinterState::new(Arc::new(config), 0)
}

#[test]
fn test_firmware_identity() {
    let state = printer(2);
    state.analyse_response(
        "FIRMWARE_NAME:Repetier_1.0.4 FIRMWARE_URL:https://github.com/repetier/Repetier-Firmware/ \
         PROTOCOL_VERSION:1.0 MACHINE_TYPE:Mendel EXTRUDER_COUNT:2 REPETIER_PROTOCOL:3",
    );

    let firmware = state.firmware();
    assert_eq!(firmware.name, "Repetier_1.0.4");
    assert_eq!(firmware.url, "https://github.com/repetier/Repetier-Firmware/");
    assert_eq!(firmware.protocol_version, "1.0");
    assert_eq!(firmware.machine_type, "Mendel");
    assert_eq!(firmware.extruder_count, 2);
    assert_eq!(firmware.family, FirmwareFamily::Repetier);
    assert_eq!(state.binary_version(), 3);

    let snapshot = state.snapshot();
    assert_eq!(snapshot.firmware, "Repetier_1.0.4");
    assert_eq!(snapshot.firmware_url, "https://github.com/repetier/Repetier-Firmware/");
}

#[test]
fn test_reset_forgets_family_but_keeps_name() {
    let state = printer(1);
    state.analyse_response("FIRMWARE_NAME:Marlin");
    assert_eq!(state.firmware_family(), FirmwareFamily::Marlin);

    state.reset();
    assert_eq!(state.firmware_family(), FirmwareFamily::Unknown);
    assert_eq!(state.firmware().name, "Marlin");
}

#[test]
fn test_marlin_heater_output_is_doubled() {
    let state = printer(1);
    state.analyse_response("FIRMWARE_NAME:Marlin 2.1.2 (Github) EXTRUDER_COUNT:1");

    let class = state.analyse_response("ok T:201.3 /210.0 B:59.8 /60.0 @:64 B@:127");

    assert_eq!(class, ResponseClass::Telemetry);
    let ex = state.extruder(-1);
    assert_eq!(ex.temp_read, 201.3);
    assert_eq!(ex.output, 128);
    assert_eq!(state.bed().temp_read, 59.8);
}

#[test]
fn test_unidentified_heater_output_is_unscaled() {
    let state = printer(1);
    state.analyse_response("T:201.3 @:64");
    assert_eq!(state.extruder(-1).output, 64);
    assert!(state.last_temperature_update().is_some());
}

#[test]
fn test_bare_and_indexed_temperatures_attribution() {
    let state = printer(2);
    state.analyze(&CommandFields::tool(1));

    state.analyse_response("ok T:150.0 /210.0 B:60.0 /60.0 T0:140.0 /200.0 @0:10 @:30");

    assert_eq!(state.extruder(1).temp_read, 150.0);
    assert_eq!(state.extruder(1).output, 30);
    assert_eq!(state.extruder(0).temp_read, 140.0);
    assert_eq!(state.extruder(0).output, 10);
}

#[test]
fn test_indexed_temperatures_stop_at_first_gap() {
    let state = printer(3);
    state.analyse_response("T0:100.0 T1:110.0 T3:130.0");

    assert_eq!(state.extruder(0).temp_read, 100.0);
    assert_eq!(state.extruder(1).temp_read, 110.0);
    assert_eq!(state.extruder(3).temp_read, 0.0);
}

#[test]
fn test_indexed_temperature_beyond_slots_lands_on_first_extruder() {
    let state = printer(1);
    state.analyse_response("T0:100.0 T1:110.0 T2:120.0");

    // Two slots for one configured extruder; T2 falls back to slot 0
    assert_eq!(state.extruder(1).temp_read, 110.0);
    assert_eq!(state.extruder(0).temp_read, 120.0);
}

#[test]
fn test_telemetry_classes() {
    let state = printer(1);

    assert_eq!(
        state.analyse_response("SpeedMultiply:110"),
        ResponseClass::Telemetry
    );
    assert_eq!(
        state.analyse_response("FlowMultiply:95"),
        ResponseClass::Telemetry
    );
    assert_eq!(state.multipliers(), (110, 95));

    assert_eq!(
        state.analyse_response("TargetExtr0:215"),
        ResponseClass::Telemetry
    );
    assert_eq!(state.extruder(0).temp_set, 215.0);

    assert_eq!(
        state.analyse_response("TargetBed:65"),
        ResponseClass::Telemetry
    );
    assert_eq!(state.bed().temp_set, 65.0);

    assert_eq!(
        state.analyse_response("Fanspeed:255"),
        ResponseClass::Telemetry
    );
    assert_eq!(state.snapshot().fan_voltage, 255);

    assert_eq!(state.analyse_response("ok"), ResponseClass::Unclassified);
    assert_eq!(
        state.analyse_response("X:1.00 Y:2.00 Z:3.00 E:0.00"),
        ResponseClass::Unclassified
    );
}

#[test]
fn test_second_extruder_target_updates_first_extruder() {
    let state = printer(2);
    assert_eq!(
        state.analyse_response("TargetExtr1:190"),
        ResponseClass::Telemetry
    );
    assert_eq!(state.extruder(0).temp_set, 190.0);
    assert_eq!(state.extruder(1).temp_set, 0.0);
}

#[test]
fn test_position_report_applies_offset() {
    let state = printer(1);
    state.analyze(&CommandFields::g(1).with_x(30.0).with_y(40.0));
    state.analyze(&CommandFields::g(92).with_x(0.0).with_y(0.0));

    state.analyse_response("X:5.00 Y:-2.50 Z:1.00 E:3.00");

    assert_eq!(state.position(), (35.0, 37.5, 1.0));
    assert_eq!(state.offset(Axis::X), 30.0);
    assert_eq!(state.extruder(-1).e_pos, 3.0);
}

#[test]
fn test_malformed_values_are_ignored() {
    let state = printer(1);
    state.analyze(&CommandFields::g(1).with_x(12.0));
    let class = state.analyse_response("X:abc T:/210.0 SpeedMultiply:");

    assert_eq!(class, ResponseClass::Unclassified);
    assert_eq!(state.position().0, 12.0);
    assert_eq!(state.multipliers(), (100, 100));
}
