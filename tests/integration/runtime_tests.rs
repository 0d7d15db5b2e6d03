//! Startup and loop tests: output init, baseline retries, the setpoint
//! dial, and signal-driven shutdown.

use std::sync::atomic::AtomicBool;
use std::time::Duration;

use embedded_hal::digital::PinState;

use humidifier::adapters::sim::Dht11Waveform;
use humidifier::app::events::ControllerEvent;
use humidifier::app::ports::PinMode;
use humidifier::app::runtime::{acquire_baseline, run};
use humidifier::config::{ConfigError, SystemConfig};
use humidifier::control::setpoint::SetpointSource;
use humidifier::error::Error;
use humidifier::pins::DIAL_ADC_CHANNEL;

use crate::mock_hw::{MockHardware, RecordingSink, StopAfterTicks};

const RELAY: u8 = 14;
const BUZZER: u8 = 18;
const LIGHT: u8 = 21;
const WATER_CH: u8 = 1;

fn statuses(events: &[ControllerEvent]) -> Vec<humidifier::app::events::StatusLine> {
    events
        .iter()
        .filter_map(|e| match e {
            ControllerEvent::Status(s) => Some(*s),
            _ => None,
        })
        .collect()
}

// ── Baseline ──────────────────────────────────────────────────

#[test]
fn baseline_retries_until_both_sensors_answer() {
    let cfg = SystemConfig::default();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let stop = AtomicBool::new(false);

    hw.push_frame(Dht11Waveform::silent());
    hw.push_frame(Dht11Waveform::silent());
    hw.set_reading(47, 23);

    let (reading, water) = acquire_baseline(&cfg, &mut hw, &mut sink, &stop).unwrap();
    assert_eq!(reading.humidity_percent, 47.0);
    assert_eq!(water, 99.0);
    assert_eq!(
        sink.events,
        vec![
            ControllerEvent::BaselineRetry { attempt: 1 },
            ControllerEvent::BaselineRetry { attempt: 2 },
        ]
    );
    assert!(hw.elapsed() >= Duration::from_millis(2 * 2000));
}

#[test]
fn baseline_needs_a_water_reading_too() {
    let cfg = SystemConfig::default();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let stop = AtomicBool::new(false);

    hw.fail_analog(WATER_CH);
    // Give up after the first retry by raising the flag from the sink.
    let mut stopper = StopOnRetry {
        inner: &mut sink,
        flag: &stop,
    };
    assert!(acquire_baseline(&cfg, &mut hw, &mut stopper, &stop).is_none());
    assert_eq!(sink.events, vec![ControllerEvent::BaselineRetry { attempt: 1 }]);
}

struct StopOnRetry<'a> {
    inner: &'a mut RecordingSink,
    flag: &'a AtomicBool,
}

impl humidifier::app::ports::EventSink for StopOnRetry<'_> {
    fn emit(&mut self, event: &ControllerEvent) {
        if matches!(event, ControllerEvent::BaselineRetry { .. }) {
            self.flag.store(true, std::sync::atomic::Ordering::Relaxed);
        }
        self.inner.emit(event);
    }
}

// ── Full loop ─────────────────────────────────────────────────

#[test]
fn run_initialises_outputs_idle_before_anything_else() {
    let cfg = SystemConfig::default();
    let mut hw = MockHardware::new();
    let stop = AtomicBool::new(false);
    let mut sink = StopAfterTicks::new(1, &stop);

    run(&cfg, &mut hw, &mut sink, &stop).unwrap();

    let first: Vec<_> = hw.calls.iter().take(6).copied().collect();
    use crate::mock_hw::HwCall::{Mode, Write};
    assert_eq!(
        first,
        vec![
            Mode {
                pin: RELAY,
                mode: PinMode::Output
            },
            Write {
                pin: RELAY,
                level: PinState::High
            },
            Mode {
                pin: BUZZER,
                mode: PinMode::Output
            },
            Write {
                pin: BUZZER,
                level: PinState::Low
            },
            Mode {
                pin: LIGHT,
                mode: PinMode::Output
            },
            Write {
                pin: LIGHT,
                level: PinState::Low
            },
        ]
    );
}

#[test]
fn run_ticks_until_shutdown_then_idles_outputs() {
    let cfg = SystemConfig::default();
    let mut hw = MockHardware::new();
    hw.set_reading(30, 22);
    let stop = AtomicBool::new(false);
    let mut sink = StopAfterTicks::new(3, &stop);

    run(&cfg, &mut hw, &mut sink, &stop).unwrap();

    let events = &sink.inner.events;
    assert!(matches!(
        events.first(),
        Some(ControllerEvent::BaselineAcquired { .. })
    ));
    assert_eq!(events.last(), Some(&ControllerEvent::Stopped));
    assert_eq!(statuses(events).len(), 3);
    assert!(statuses(events)[0].fan_on, "30% is well below 50 - 2");

    assert_eq!(hw.level(RELAY), Some(PinState::High));
    assert_eq!(hw.level(BUZZER), Some(PinState::Low));
    assert_eq!(hw.level(LIGHT), Some(PinState::Low));

    // Three ticks, each just over 2 s apart.
    assert!(hw.elapsed() > Duration::from_millis(3 * 2000));
    assert!(hw.elapsed() < Duration::from_millis(4 * 2000));
}

#[test]
fn dial_setpoint_is_reread_every_pass() {
    let cfg = SystemConfig {
        setpoint: SetpointSource::Dial {
            channel: DIAL_ADC_CHANNEL,
        },
        ..SystemConfig::default()
    };
    let mut hw = MockHardware::new();
    hw.set_analog(DIAL_ADC_CHANNEL, 1023);
    hw.set_reading(60, 22);
    let stop = AtomicBool::new(false);
    let mut sink = StopAfterTicks::new(1, &stop);

    run(&cfg, &mut hw, &mut sink, &stop).unwrap();

    assert!(sink.inner.events.contains(&ControllerEvent::Started { set_humidity: 100.0 }));
    let s = statuses(&sink.inner.events)[0];
    assert_eq!(s.set_humidity, 100.0);
    assert!(s.fan_on, "60% is below a 100% target");
}

#[test]
fn unreadable_dial_falls_back_to_default_target() {
    let cfg = SystemConfig {
        setpoint: SetpointSource::Dial { channel: 3 },
        ..SystemConfig::default()
    };
    let mut hw = MockHardware::new();
    let stop = AtomicBool::new(false);
    let mut sink = StopAfterTicks::new(1, &stop);

    run(&cfg, &mut hw, &mut sink, &stop).unwrap();
    assert_eq!(statuses(&sink.inner.events)[0].set_humidity, 50.0);
}

#[test]
fn shutdown_before_baseline_still_idles_outputs() {
    let cfg = SystemConfig::default();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let stop = AtomicBool::new(true);

    run(&cfg, &mut hw, &mut sink, &stop).unwrap();
    assert_eq!(sink.events, vec![ControllerEvent::Stopped]);
    assert_eq!(hw.level(RELAY), Some(PinState::High));
}

#[test]
fn invalid_config_is_rejected_before_touching_hardware() {
    let cfg = SystemConfig {
        poll_interval_ms: 0,
        ..SystemConfig::default()
    };
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    let stop = AtomicBool::new(false);

    let err = run(&cfg, &mut hw, &mut sink, &stop).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ValidationFailed(_))));
    assert!(hw.calls.is_empty());
}
