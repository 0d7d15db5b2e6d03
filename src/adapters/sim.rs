//! Simulated humidifier for host builds.
//!
//! Implements [`HardwarePort`] against a small room model:
//!
//! - humidity climbs while the fan relay is energised and relaxes towards
//!   the ambient level otherwise,
//! - the reservoir drains while the fan runs and is topped up again some
//!   time after it runs dry,
//! - the DHT11 answers each handshake with a synthetic waveform
//!   ([`Dht11Waveform`]) that encodes the current room state.
//!
//! Time is virtual: every delay advances an internal nanosecond clock, so
//! the µs-level DHT11 polling decodes deterministically.  In real-time
//! mode millisecond delays also sleep, so the binary paces like the real
//! thing.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::info;

use crate::app::ports::{HardwarePort, PinMode};
use crate::config::SystemConfig;
use crate::error::SensorError;
use crate::pins::{ADC_CHANNELS, ADC_MAX};

// ───────────────────────────────────────────────────────────────
// DHT11 waveform synthesis
// ───────────────────────────────────────────────────────────────

/// Polls the line stays high after the host releases it.
pub const RELEASE_POLLS: u32 = 10;
/// Width of each half of the sensor's response preamble.
pub const PREAMBLE_POLLS: u32 = 30;
/// Low gap before every data pulse (and after the last one).
pub const GAP_POLLS: u32 = 20;
/// High pulse width for a 0 bit.
pub const ZERO_POLLS: u32 = 8;
/// High pulse width for a 1 bit.
pub const ONE_POLLS: u32 = 30;

/// What the data line does after the host releases it, as a list of
/// `(level, polls)` segments.  One poll is one `delay_us(1)`.  Past the
/// last segment the line idles high.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dht11Waveform {
    segments: Vec<(PinState, u32)>,
}

impl Dht11Waveform {
    /// A line that never answers.
    pub fn silent() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Arbitrary `(level, polls)` segments, replayed as given.
    pub fn from_segments(segments: Vec<(PinState, u32)>) -> Self {
        Self { segments }
    }

    /// Five raw bytes with the default pulse widths.
    pub fn from_bytes(bytes: [u8; 5]) -> Self {
        Self::with_pulse_widths(bytes, ZERO_POLLS, ONE_POLLS)
    }

    /// A well-formed frame for integer humidity and Celsius, checksum
    /// filled in.
    pub fn from_reading(humidity: u8, temp_c: u8) -> Self {
        Self::from_bytes(Self::frame_bytes(humidity, temp_c))
    }

    /// `[rh, 0, t, 0, checksum]`.
    pub fn frame_bytes(humidity: u8, temp_c: u8) -> [u8; 5] {
        [humidity, 0, temp_c, 0, humidity.wrapping_add(temp_c)]
    }

    pub fn with_pulse_widths(bytes: [u8; 5], zero: u32, one: u32) -> Self {
        let mut segments = vec![
            (PinState::High, RELEASE_POLLS),
            (PinState::Low, PREAMBLE_POLLS),
            (PinState::High, PREAMBLE_POLLS),
        ];
        for byte in bytes {
            for bit in (0..8).rev() {
                segments.push((PinState::Low, GAP_POLLS));
                let width = if (byte >> bit) & 1 == 1 { one } else { zero };
                segments.push((PinState::High, width));
            }
        }
        segments.push((PinState::Low, GAP_POLLS));
        Self { segments }
    }

    /// Keep only the first `n` segments (the sensor stops mid-frame).
    pub fn truncated(mut self, n: usize) -> Self {
        self.segments.truncate(n);
        self
    }

    /// Line level `polls` after release.
    pub fn level_at(&self, polls: u64) -> PinState {
        let mut t = polls;
        for &(level, width) in &self.segments {
            if t < u64::from(width) {
                return level;
            }
            t -= u64::from(width);
        }
        PinState::High
    }

    /// Polls until the line goes idle.
    pub fn len_polls(&self) -> u64 {
        self.segments.iter().map(|&(_, w)| u64::from(w)).sum()
    }

    pub fn segments(&self) -> &[(PinState, u32)] {
        &self.segments
    }
}

// ───────────────────────────────────────────────────────────────
// Room model
// ───────────────────────────────────────────────────────────────

const AMBIENT_HUMIDITY: f64 = 35.0;
/// %RH per second gained while the fan runs.
const HUMIDIFY_RATE: f64 = 0.8;
/// Fraction of the gap to ambient lost per second.
const DECAY_RATE: f64 = 0.01;
/// ADC counts drained per second while the fan runs.
const DRAIN_RATE: f64 = 4.0;
const FULL_TANK_RAW: f64 = 900.0;
/// Raw level below which the probe is dry.
const DRY_RAW: f64 = 60.0;
/// How long the tank stays empty before someone refills it.
const REFILL_AFTER: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Room {
    humidity: f64,
    temp_c: f64,
    reservoir_raw: f64,
    dry_for: Duration,
}

impl Room {
    fn step(&mut self, dt: Duration, fan_on: bool) {
        let secs = dt.as_secs_f64();
        if fan_on && self.reservoir_raw > DRY_RAW {
            self.humidity = (self.humidity + HUMIDIFY_RATE * secs).min(95.0);
            self.reservoir_raw = (self.reservoir_raw - DRAIN_RATE * secs).max(0.0);
        } else {
            self.humidity -= (self.humidity - AMBIENT_HUMIDITY) * (DECAY_RATE * secs).min(1.0);
        }

        if self.reservoir_raw <= DRY_RAW {
            self.dry_for += dt;
            if self.dry_for >= REFILL_AFTER {
                info!("sim: reservoir refilled");
                self.reservoir_raw = FULL_TANK_RAW;
                self.dry_for = Duration::ZERO;
            }
        } else {
            self.dry_for = Duration::ZERO;
        }
    }
}

// ───────────────────────────────────────────────────────────────
// SimHardware
// ───────────────────────────────────────────────────────────────

/// Minimum virtual time between room updates.
const ROOM_STEP_NS: u64 = 1_000_000;

pub struct SimHardware {
    epoch: Instant,
    now_ns: u64,
    room_ns: u64,
    realtime: bool,
    room: Room,
    relay_pin: u8,
    relay_active_low: bool,
    dht_pin: u8,
    water_channel: u8,
    dial_raw: u16,
    levels: [PinState; 64],
    response: Option<(u64, Dht11Waveform)>,
    frames: u32,
    corrupt_every: u32,
}

impl SimHardware {
    /// Real-time simulation wired like `config`.
    pub fn new(config: &SystemConfig) -> Self {
        let mut sim = Self::accelerated(config);
        sim.realtime = true;
        sim
    }

    /// Same model, but delays never sleep.
    pub fn accelerated(config: &SystemConfig) -> Self {
        info!(
            "sim: room at {:.0}% RH, tank {:.0}/{}",
            AMBIENT_HUMIDITY, FULL_TANK_RAW, ADC_MAX
        );
        Self {
            epoch: Instant::now(),
            now_ns: 0,
            room_ns: 0,
            realtime: false,
            room: Room {
                humidity: AMBIENT_HUMIDITY,
                temp_c: 22.0,
                reservoir_raw: FULL_TANK_RAW,
                dry_for: Duration::ZERO,
            },
            relay_pin: config.pins.relay,
            relay_active_low: config.relay_active_low,
            dht_pin: config.pins.dht,
            water_channel: config.water_adc_channel,
            dial_raw: ADC_MAX / 2,
            levels: [PinState::High; 64],
            response: None,
            frames: 0,
            corrupt_every: 0,
        }
    }

    /// Flip a checksum bit on every `n`th DHT11 frame (0 = never).
    pub fn corrupt_every(mut self, n: u32) -> Self {
        self.corrupt_every = n;
        self
    }

    /// Raw value returned by every ADC channel other than the water probe.
    pub fn set_dial(&mut self, raw: u16) {
        self.dial_raw = raw;
    }

    pub fn set_reservoir(&mut self, raw: u16) {
        self.room.reservoir_raw = f64::from(raw);
    }

    pub fn room_humidity(&self) -> f64 {
        self.room.humidity
    }

    pub fn fan_energised(&self) -> bool {
        let level = self.levels[usize::from(self.relay_pin) % 64];
        (level == PinState::Low) == self.relay_active_low
    }

    fn advance(&mut self, ns: u64) {
        self.now_ns += ns;
        let pending = self.now_ns - self.room_ns;
        if pending >= ROOM_STEP_NS {
            let fan = self.fan_energised();
            self.room.step(Duration::from_nanos(pending), fan);
            self.room_ns = self.now_ns;
        }
    }

    fn next_frame(&mut self) -> Dht11Waveform {
        self.frames = self.frames.wrapping_add(1);
        let rh = self.room.humidity.round().clamp(0.0, 99.0) as u8;
        let t = self.room.temp_c.round().clamp(0.0, 50.0) as u8;
        let mut bytes = Dht11Waveform::frame_bytes(rh, t);
        if self.corrupt_every != 0 && self.frames % self.corrupt_every == 0 {
            bytes[4] ^= 0x01;
        }
        Dht11Waveform::from_bytes(bytes)
    }
}

impl DelayNs for SimHardware {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(u64::from(ns));
        if self.realtime && ns >= 1_000_000 {
            std::thread::sleep(Duration::from_nanos(u64::from(ns)));
        }
    }
}

impl HardwarePort for SimHardware {
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) {
        if pin == self.dht_pin && mode == PinMode::Input {
            let wave = self.next_frame();
            self.response = Some((self.now_ns, wave));
        }
    }

    fn write_digital(&mut self, pin: u8, level: PinState) {
        self.levels[usize::from(pin) % 64] = level;
    }

    fn read_digital(&mut self, pin: u8) -> PinState {
        if pin == self.dht_pin {
            return match &self.response {
                Some((start, wave)) => wave.level_at((self.now_ns - start) / 1000),
                None => PinState::High,
            };
        }
        self.levels[usize::from(pin) % 64]
    }

    fn read_analog(&mut self, channel: u8) -> Result<u16, SensorError> {
        if channel >= ADC_CHANNELS {
            return Err(SensorError::InvalidChannel(channel));
        }
        if channel == self.water_channel {
            Ok(self.room.reservoir_raw.round().clamp(0.0, f64::from(ADC_MAX)) as u16)
        } else {
            Ok(self.dial_raw)
        }
    }

    fn now(&self) -> Instant {
        self.epoch + Duration::from_nanos(self.now_ns)
    }
}
