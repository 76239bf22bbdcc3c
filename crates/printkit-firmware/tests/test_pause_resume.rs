use printkit_core::{Axis, AxisLimits, CommandFields, InjectionError, PrinterConfig};
use printkit_firmware::{resolve_extruder_index, PrinterState};
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;
use tokio::sync::mpsc;

fn printer() -> PrinterState {
    PrinterState::new(Arc::new(PrinterConfig::default()), 0)
}

fn g1() -> CommandFields {
    CommandFields::g(1)
}

#[test]
fn test_resume_sequence() {
    let state = printer();
    state.analyze(&g1().with_x(10.5).with_y(20.25).with_z(0.3).with_f(1800.0));
    state.analyze(&g1().with_e(5.0));
    state.analyze(&CommandFields::g(92).with_e(0.0));
    state.analyze(&g1().with_e(2.5));

    let record = state.store_pause();
    assert_eq!(record.x, 10.5);
    assert_eq!(record.e, 2.5);
    assert_eq!(record.feed_rate, 1800.0);
    assert!(!record.relative);
    assert_eq!(state.pause_record(), Some(record));

    // Head parks while paused
    state.analyze(&CommandFields::g(91));
    state.analyze(&g1().with_z(10.0).with_f(600.0));
    state.analyze(&g1().with_x(-10.0).with_y(-10.0));

    assert_eq!(
        state.resume_commands(),
        vec![
            "G90".to_string(),
            "G1 X10.50 Y20.25 F6000".to_string(),
            "G1 Z0.30 F120".to_string(),
            "G92 E2.5000".to_string(),
            "G1 F1800".to_string(),
        ]
    );
}

#[test]
fn test_resume_restores_relative_mode() {
    let state = printer();
    state.analyze(&CommandFields::g(91));
    state.analyze(&g1().with_x(4.0).with_f(1200.0));
    state.store_pause();

    // Mode unchanged while paused still needs G91 after the absolute moves
    let commands = state.resume_commands();
    assert_eq!(commands.len(), 6);
    assert_eq!(commands[4], "G91");
    assert_eq!(commands[5], "G1 F1200");

    state.analyze(&CommandFields::g(90));
    assert_eq!(state.resume_commands(), commands);
}

#[test]
fn test_resume_returns_to_pre_pause_position_with_offsets() {
    let state = printer();
    state.analyze(&g1().with_x(50.0).with_y(50.0).with_z(2.0));
    state.analyze(&CommandFields::g(92).with_x(0.0).with_y(0.0));
    state.analyze(&g1().with_x(10.0).with_y(5.0));
    let before = state.position();

    let record = state.store_pause();
    assert_eq!((record.x, record.y, record.z), (10.0, 5.0, 2.0));

    state.analyze(&g1().with_x(0.0).with_y(0.0).with_z(20.0));
    assert_ne!(state.position(), before);

    // Replay what the resume sequence sends
    state.analyze(&CommandFields::g(90));
    state.analyze(&g1().with_x(record.x).with_y(record.y));
    state.analyze(&g1().with_z(record.z));
    state.analyze(&CommandFields::g(92).with_e(record.e));

    assert_eq!(state.position(), before);
}

#[test]
fn test_inject_unpause_into_channel() {
    let state = printer();
    state.analyze(&g1().with_x(1.0).with_y(2.0).with_f(900.0));
    state.store_pause();

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state.inject_unpause(&tx).unwrap();

    let mut received = Vec::new();
    while let Ok(command) = rx.try_recv() {
        received.push(command);
    }
    assert_eq!(received, state.resume_commands());
    assert_eq!(received[1], "G1 X1.00 Y2.00 F6000");
}

#[test]
fn test_inject_unpause_closed_channel() {
    let state = printer();
    state.store_pause();

    let (tx, rx) = mpsc::unbounded_channel::<String>();
    drop(rx);

    assert_eq!(
        state.inject_unpause(&tx),
        Err(InjectionError::ChannelClosed {
            command: "G90".to_string()
        })
    );
}

#[test]
fn test_inject_unpause_stops_when_channel_full() {
    let state = printer();
    state.store_pause();

    let (tx, mut rx) = mpsc::channel::<String>(2);
    let result = state.inject_unpause(&tx);

    assert!(matches!(
        result,
        Err(InjectionError::ChannelFull { ref command }) if command.starts_with("G1 Z")
    ));
    assert_eq!(rx.try_recv().unwrap(), "G90");
}

#[test]
fn test_inject_without_pause_sends_nothing() {
    let state = printer();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    state.inject_unpause(&tx).unwrap();
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_sender_and_reader_share_state() {
    let state = Arc::new(printer());
    state.analyze(&CommandFields::g(91));

    let sender = {
        let state = Arc::clone(&state);
        thread::spawn(move || {
            for _ in 0..1000 {
                state.analyze(&g1().with_x(0.1).with_f(3000.0));
            }
        })
    };
    let reader = {
        let state = Arc::clone(&state);
        thread::spawn(move || {
            for i in 0..1000 {
                state.analyse_response(&format!("T:{}.0 /210.0 B:60.0 /60.0 @:64", i % 200));
                let snapshot = state.snapshot();
                assert_eq!(snapshot.y, 0.0);
                assert!(snapshot.x >= 0.0 && snapshot.x <= 100.0 + 1e-6);
            }
        })
    };

    sender.join().unwrap();
    reader.join().unwrap();

    assert!((state.position().0 - 100.0).abs() < 1e-6);
    assert_eq!(state.bed().temp_read, 60.0);
}

fn bounded_printer() -> PrinterState {
    let config = PrinterConfig::default()
        .with_axis(Axis::X, AxisLimits::new(-5.0, 220.0, 0.0))
        .with_axis(Axis::Z, AxisLimits::new(0.0, 180.0, 0.0));
    PrinterState::new(Arc::new(config), 0)
}

proptest! {
    #[test]
    fn prop_position_stays_within_bounds(
        moves in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0, any::<bool>()), 1..40)
    ) {
        let state = bounded_printer();
        for (x, z, relative) in moves {
            state.analyze(&CommandFields::g(if relative { 91 } else { 90 }));
            state.analyze(&g1().with_x(x).with_z(z));
            let (px, _, pz) = state.position();
            prop_assert!((-5.0..=220.0).contains(&px));
            prop_assert!((0.0..=180.0).contains(&pz));
        }
    }

    #[test]
    fn prop_set_position_echo_is_stable(p in 0.0f64..200.0, v in -100.0f64..100.0) {
        let state = printer();
        state.analyze(&g1().with_x(p));
        state.analyze(&CommandFields::g(92).with_x(v));
        state.analyse_response(&format!("X:{}", v));
        prop_assert!((state.position().0 - p).abs() < 1e-9);
    }

    #[test]
    fn prop_resolved_index_is_valid(selector in -10i32..20, slots in 1usize..8, active_seed in 0usize..8) {
        let active = active_seed % slots;
        let index = resolve_extruder_index(selector, active, slots);
        prop_assert!(index < slots);
    }
}
