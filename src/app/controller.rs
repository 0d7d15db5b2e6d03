//! Humidifier controller: the hexagonal core.
//!
//! [`HumidifierController`] owns the control state, the three averaging
//! windows, the actuators and the tick timer.  Hardware and the event
//! sink are injected at call sites, so the whole thing runs against a
//! mock in tests.
//!
//! ```text
//!  HardwarePort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!   (DHT11, ADC)    │     HumidifierController      │
//!                   │ windows · hysteresis · timer  │
//!  HardwarePort ◀── └──────────────────────────────┘
//!  (relay, buzzer, LED)
//! ```
//!
//! One tick:
//!
//! 1. sample the water probe, push into its window, derive `out_of_water`
//! 2. decode the DHT11, push temperature and humidity on success
//! 3. let the line settle
//! 4. run [`ControllerState::step`] on the averages
//! 5. apply the returned [`Actions`]

use std::time::Duration;

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::hysteresis::{Actions, ControllerState, FanCommand, TickInputs};
use crate::control::window::History;
use crate::drivers::Actuators;
use crate::sensors::{Reading, SensorFrameDecoder, WaterLevelMonitor};
use crate::timer::Timer;

use super::events::{ControllerEvent, Counters, StatusLine};
use super::ports::{EventSink, HardwarePort};

// ───────────────────────────────────────────────────────────────
// HumidifierController
// ───────────────────────────────────────────────────────────────

pub struct HumidifierController {
    config: SystemConfig,
    state: ControllerState,
    humidity: History,
    temperature: History,
    water: History,
    decoder: SensorFrameDecoder,
    monitor: WaterLevelMonitor,
    actuators: Actuators,
    timer: Timer,
    counters: Counters,
}

impl HumidifierController {
    /// Build the controller around a baseline reading.
    ///
    /// Every window is pre-filled so averages are defined from the first
    /// tick.  The tick timer starts running at `hw.now()`.
    pub fn with_baseline(
        config: SystemConfig,
        actuators: Actuators,
        set_humidity: f64,
        reading: Reading,
        water_level: f64,
        hw: &impl HardwarePort,
    ) -> Self {
        let decoder = SensorFrameDecoder::new(config.pins.dht);
        let monitor = WaterLevelMonitor::new(config.water_adc_channel, config.water_threshold);
        let timer = Timer::started(
            Duration::from_millis(u64::from(config.tick_interval_ms)),
            hw.now(),
        );
        Self {
            state: ControllerState::new(set_humidity),
            humidity: History::filled(reading.humidity_percent),
            temperature: History::filled(reading.temperature_f),
            water: History::filled(water_level),
            decoder,
            monitor,
            actuators,
            timer,
            counters: Counters::default(),
            config,
        }
    }

    // ── Inputs ────────────────────────────────────────────────

    /// Change the target humidity; takes effect at the next tick.
    pub fn set_target(&mut self, set_humidity: f64) {
        self.state.set_humidity = set_humidity;
    }

    /// Run a tick if the timer has elapsed, then restart it.
    pub fn poll(
        &mut self,
        hw: &mut impl HardwarePort,
        sink: &mut impl EventSink,
    ) -> Option<Actions> {
        if !self.timer.is_elapsed(hw.now()) {
            return None;
        }
        let actions = self.tick(hw, sink);
        self.timer.reset(hw.now());
        Some(actions)
    }

    /// One unconditional control tick.
    pub fn tick(&mut self, hw: &mut impl HardwarePort, sink: &mut impl EventSink) -> Actions {
        self.counters.ticks += 1;

        match self.monitor.sample(hw) {
            Ok(level) => self.water.shift_append(level),
            Err(e) => {
                self.counters.water_failed += 1;
                sink.emit(&ControllerEvent::WaterSampleFailed(e));
            }
        }
        let out_of_water = self.monitor.is_out_of_water(&self.water);

        match self.decoder.decode(hw) {
            Ok(reading) => {
                self.counters.frames_ok += 1;
                self.temperature.shift_append(reading.temperature_f);
                self.humidity.shift_append(reading.humidity_percent);
            }
            Err(e) => {
                self.counters.frames_failed += 1;
                sink.emit(&ControllerEvent::ReadingSkipped(e));
            }
        }
        hw.delay_ms(self.config.post_read_settle_ms);

        let inputs = TickInputs {
            avg_humidity: self.humidity.average(),
            out_of_water,
        };
        let (next, actions) = self.state.step(inputs, self.config.tolerance);
        self.state = next;
        self.apply(hw, sink, &actions);

        sink.emit(&ControllerEvent::Status(self.status()));
        actions
    }

    fn apply(
        &mut self,
        hw: &mut impl HardwarePort,
        sink: &mut impl EventSink,
        actions: &Actions,
    ) {
        if let Some(cmd) = actions.fan {
            let on = cmd == FanCommand::On;
            self.actuators.fan.set(hw, on);
            sink.emit(&ControllerEvent::FanChanged {
                on,
                avg_humidity: self.humidity.average(),
            });
        }

        match actions.water_light {
            Some(true) => {
                warn!("water level low (avg {:.1})", self.water.average());
                self.actuators.water_light.set(hw, true);
                sink.emit(&ControllerEvent::WaterEmpty {
                    avg_water: self.water.average(),
                });
            }
            Some(false) => {
                info!("water refilled (avg {:.1})", self.water.average());
                self.actuators.water_light.set(hw, false);
                sink.emit(&ControllerEvent::WaterRestored {
                    avg_water: self.water.average(),
                });
            }
            None => {}
        }

        if actions.sound_alarm {
            self.actuators.buzzer.sound_alarm(
                hw,
                self.config.alarm_repetitions,
                self.config.alarm_interval_ms,
            );
        }
    }

    /// Drive every output to idle.  The controller can keep ticking
    /// afterwards; the next humidity decision re-energises the fan.
    pub fn shutdown(&mut self, hw: &mut impl HardwarePort) {
        self.actuators.all_off(hw);
        self.state.fan_on = false;
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> StatusLine {
        StatusLine {
            set_humidity: self.state.set_humidity,
            avg_humidity: self.humidity.average(),
            avg_temperature_f: self.temperature.average(),
            avg_water: self.water.average(),
            fan_on: self.state.fan_on,
            out_of_water: self.state.out_of_water,
            counters: self.counters,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    pub fn humidity(&self) -> &History {
        &self.humidity
    }

    pub fn temperature(&self) -> &History {
        &self.temperature
    }

    pub fn water(&self) -> &History {
        &self.water
    }

    pub fn actuators(&self) -> &Actuators {
        &self.actuators
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}
