//! Integration tests for the tick pipeline: mock ADC + scripted DHT11
//! frames → HumidifierController → relay / buzzer / LED writes.

use std::time::Duration;

use embedded_hal::digital::PinState;

use humidifier::adapters::sim::Dht11Waveform;
use humidifier::app::controller::HumidifierController;
use humidifier::app::events::ControllerEvent;
use humidifier::config::SystemConfig;
use humidifier::drivers::Actuators;
use humidifier::error::{FrameError, SensorError};
use humidifier::sensors::Reading;

use crate::mock_hw::{MockHardware, RecordingSink};

const RELAY: u8 = 14;
const BUZZER: u8 = 18;
const LIGHT: u8 = 21;
const WATER_CH: u8 = 1;

fn controller_with(
    cfg: &SystemConfig,
    humidity: f64,
    water: f64,
    hw: &MockHardware,
) -> HumidifierController {
    HumidifierController::with_baseline(
        cfg.clone(),
        Actuators::from_config(cfg),
        50.0,
        Reading {
            temperature_f: 72.0,
            humidity_percent: humidity,
        },
        water,
        hw,
    )
}

fn controller(humidity: f64, water: f64, hw: &MockHardware) -> HumidifierController {
    controller_with(&SystemConfig::default(), humidity, water, hw)
}

fn fan_changes(sink: &RecordingSink) -> Vec<bool> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            ControllerEvent::FanChanged { on, .. } => Some(*on),
            _ => None,
        })
        .collect()
}

// ── Humidity hysteresis ───────────────────────────────────────

#[test]
fn fan_follows_the_averaged_humidity() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(50.0, 99.0, &hw);

    hw.set_reading(40, 22);
    c.tick(&mut hw, &mut sink);
    assert!(!c.state().fan_on, "avg 49.29 is above 48");
    c.tick(&mut hw, &mut sink);
    assert!(!c.state().fan_on, "avg 48.57 is above 48");
    c.tick(&mut hw, &mut sink);
    assert!(c.state().fan_on, "avg 47.86 is below 48");
    assert_eq!(hw.level(RELAY), Some(PinState::Low), "relay is active-low");

    hw.set_reading(55, 22);
    c.tick(&mut hw, &mut sink);
    assert!((c.humidity().average() - 675.0 / 14.0).abs() < 1e-9);
    assert!(!c.state().fan_on, "avg 48.21 is back above 48");
    assert_eq!(hw.level(RELAY), Some(PinState::High));

    assert_eq!(fan_changes(&sink), vec![true, false]);
}

#[test]
fn repeated_ticks_do_not_rewrite_the_relay() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(30.0, 99.0, &hw);
    hw.set_reading(30, 22);

    for _ in 0..5 {
        c.tick(&mut hw, &mut sink);
    }
    assert!(c.state().fan_on);
    assert_eq!(hw.writes_to(RELAY), vec![PinState::Low]);
    assert_eq!(fan_changes(&sink), vec![true]);
}

#[test]
fn raised_target_switches_the_fan_on() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(50.0, 99.0, &hw);
    hw.set_reading(50, 22);

    c.tick(&mut hw, &mut sink);
    assert!(!c.state().fan_on);

    c.set_target(60.0);
    c.tick(&mut hw, &mut sink);
    assert!(c.state().fan_on);
    assert_eq!(c.status().set_humidity, 60.0);
}

#[test]
fn active_high_relay_is_honoured() {
    let cfg = SystemConfig {
        relay_active_low: false,
        ..SystemConfig::default()
    };
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller_with(&cfg, 30.0, 99.0, &hw);
    hw.set_reading(30, 22);

    c.tick(&mut hw, &mut sink);
    assert_eq!(hw.level(RELAY), Some(PinState::High));
}

// ── Sensor failures ───────────────────────────────────────────

#[test]
fn silent_sensor_leaves_windows_unchanged() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(45.0, 99.0, &hw);
    let before_h: Vec<f64> = c.humidity().iter().collect();
    let before_t: Vec<f64> = c.temperature().iter().collect();

    hw.push_frame(Dht11Waveform::silent());
    c.tick(&mut hw, &mut sink);

    assert_eq!(c.humidity().iter().collect::<Vec<_>>(), before_h);
    assert_eq!(c.temperature().iter().collect::<Vec<_>>(), before_t);
    assert_eq!(c.counters().frames_failed, 1);
    assert_eq!(c.counters().frames_ok, 0);
    assert!(sink.events.contains(&ControllerEvent::ReadingSkipped(
        FrameError::Timeout { bits: 0 }
    )));
}

#[test]
fn bad_checksum_is_skipped_then_next_frame_lands() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(45.0, 99.0, &hw);

    hw.push_frame(Dht11Waveform::from_bytes([40, 0, 22, 0, 0]));
    hw.set_reading(40, 22);
    c.tick(&mut hw, &mut sink);
    assert_eq!(c.humidity().latest(), 45.0);
    assert!(sink.events.contains(&ControllerEvent::ReadingSkipped(
        FrameError::ChecksumMismatch {
            expected: 62,
            actual: 0
        }
    )));

    c.tick(&mut hw, &mut sink);
    assert_eq!(c.humidity().latest(), 40.0);
    assert_eq!(c.temperature().latest(), 22.0 * 9.0 / 5.0 + 32.0);
    assert_eq!(c.counters().frames_ok, 1);
}

#[test]
fn failed_water_sample_keeps_previous_average() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(50.0, 60.0, &hw);

    hw.fail_analog(WATER_CH);
    c.tick(&mut hw, &mut sink);

    assert_eq!(c.water().average(), 60.0);
    assert_eq!(c.counters().water_failed, 1);
    assert!(sink.events.contains(&ControllerEvent::WaterSampleFailed(
        SensorError::AdcReadFailed
    )));
    assert_eq!(c.counters().frames_ok, 1, "humidity still updates");
}

// ── Water alarm ───────────────────────────────────────────────

#[test]
fn empty_tank_alarms_once_and_holds_the_fan_off() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(30.0, 11.0, &hw);
    hw.set_reading(30, 22);
    hw.set_analog(WATER_CH, 0);

    // (13 * 11 - 1) / 14 = 10.14: still wet, fan starts.
    c.tick(&mut hw, &mut sink);
    assert!(c.state().fan_on);
    assert!(!c.state().out_of_water);

    // (12 * 11 - 2) / 14 = 9.29: empty.
    let t0 = hw.elapsed();
    c.tick(&mut hw, &mut sink);
    assert!(c.state().out_of_water);
    assert!(!c.state().fan_on);
    assert_eq!(hw.level(RELAY), Some(PinState::High));
    assert_eq!(hw.level(LIGHT), Some(PinState::High));
    assert_eq!(hw.high_writes(BUZZER), 10);
    assert!(hw.elapsed() - t0 >= Duration::from_millis(3000));

    for _ in 0..4 {
        c.tick(&mut hw, &mut sink);
    }
    assert_eq!(hw.high_writes(BUZZER), 10, "alarm is edge-triggered");
    assert!(!c.state().fan_on, "low humidity must not restart a dry fan");
    assert_eq!(fan_changes(&sink), vec![true, false]);
    assert_eq!(
        sink.count(|e| matches!(e, ControllerEvent::WaterEmpty { .. })),
        1
    );
}

#[test]
fn refill_clears_the_indicator_once() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(50.0, 11.0, &hw);
    hw.set_reading(50, 22);
    hw.set_analog(WATER_CH, 0);
    for _ in 0..3 {
        c.tick(&mut hw, &mut sink);
    }
    assert!(c.state().out_of_water);

    hw.set_analog(WATER_CH, 1023);
    for _ in 0..3 {
        c.tick(&mut hw, &mut sink);
    }
    assert!(!c.state().out_of_water);
    assert_eq!(hw.writes_to(LIGHT), vec![PinState::High, PinState::Low]);
    assert_eq!(
        sink.count(|e| matches!(e, ControllerEvent::WaterRestored { .. })),
        1
    );
}

#[test]
fn water_threshold_from_config_is_used() {
    let cfg = SystemConfig {
        water_threshold: 50.0,
        ..SystemConfig::default()
    };
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller_with(&cfg, 50.0, 40.0, &hw);
    hw.set_reading(50, 22);
    hw.set_analog(WATER_CH, 410); // maps to 39

    c.tick(&mut hw, &mut sink);
    assert!(c.state().out_of_water);
}

// ── Timer gating ──────────────────────────────────────────────

#[test]
fn poll_ticks_only_after_the_interval() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(50.0, 99.0, &hw);

    hw.advance(Duration::from_millis(2000));
    assert!(c.poll(&mut hw, &mut sink).is_none());
    hw.advance(Duration::from_millis(1));
    assert!(c.poll(&mut hw, &mut sink).is_some());
    assert_eq!(sink.statuses(), 1);

    // The timer restarts after the tick's own delays.
    assert!(c.poll(&mut hw, &mut sink).is_none());
    hw.advance(Duration::from_millis(2000));
    assert!(c.poll(&mut hw, &mut sink).is_none());
    hw.advance(Duration::from_millis(1));
    assert!(c.poll(&mut hw, &mut sink).is_some());
    assert_eq!(c.counters().ticks, 2);
}

// ── Shutdown ──────────────────────────────────────────────────

#[test]
fn shutdown_idles_every_output() {
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let mut c = controller(30.0, 99.0, &hw);
    hw.set_reading(30, 22);
    c.tick(&mut hw, &mut sink);
    assert_eq!(hw.level(RELAY), Some(PinState::Low));

    c.shutdown(&mut hw);
    assert_eq!(hw.level(RELAY), Some(PinState::High));
    assert_eq!(hw.level(BUZZER), Some(PinState::Low));
    assert_eq!(hw.level(LIGHT), Some(PinState::Low));
    assert!(!c.state().fan_on);
}
