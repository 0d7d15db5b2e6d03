//! DHT11 single-wire temperature/humidity sensor.
//!
//! The host pulls the data line low for 18 ms, releases it high for
//! 40 µs, then turns the pin around and listens.  The sensor answers with
//! an 80 µs low / 80 µs high preamble followed by 40 bits; each bit is a
//! ~50 µs low gap and a high pulse whose width carries the value (short =
//! 0, long = 1).
//!
//! The decoder busy-polls the line in `delay_us(1)` steps and counts how
//! many polls each level lasts.  A count above [`ONE_BIT_THRESHOLD`] is a
//! 1.  The count is a poll count, not microseconds: on a Pi each poll
//! costs noticeably more than 1 µs, and the threshold is tuned for that.
//!
//! ```text
//!  index: 0     1      2      3    4     5    6     ...   82    83   84
//!        ┌──┐      ┌──────┐      ┌───┐     ┌─┐           ┌───┐
//!  ──────┘  └──────┘      └──────┘   └─────┘ └─── ... ───┘   └────┘‾‾‾‾
//!        │  header (ignored)   │gap │bit0│gap│bit1        bit39     timeout
//! ```
//!
//! Frame layout: `[rh_int, rh_frac, t_int, t_frac, checksum]`, checksum =
//! low byte of the sum of the first four.  Only the integer bytes feed the
//! reading; the fractional bytes are carried on [`RawFrame`] for logging.

use embedded_hal::digital::PinState;
use log::debug;

use crate::app::ports::{HardwarePort, PinMode};
use crate::error::FrameError;

/// Level changes sampled per exchange.
pub const MAX_TIMINGS: usize = 85;
/// Polls after which a level is considered stuck.
pub const POLL_TIMEOUT: u8 = 255;
/// High-pulse poll counts above this decode as a 1.
pub const ONE_BIT_THRESHOLD: u8 = 16;
/// Payload + checksum bits in one frame.
pub const FRAME_BITS: u8 = 40;

/// Transitions before the first data pulse is measured.
const HEADER_TRANSITIONS: usize = 4;
const START_LOW_MS: u32 = 18;
const START_HIGH_US: u32 = 40;

// ---------------------------------------------------------------------------
// Reading / RawFrame
// ---------------------------------------------------------------------------

/// A successfully decoded measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub temperature_f: f64,
    pub humidity_percent: f64,
}

/// The five bytes shifted in from the line, and how many bits arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawFrame {
    pub bytes: [u8; 5],
    pub bits: u8,
}

impl RawFrame {
    /// A complete frame carrying `bytes`.
    pub fn from_bytes(bytes: [u8; 5]) -> Self {
        Self {
            bytes,
            bits: FRAME_BITS,
        }
    }

    pub fn humidity_int(&self) -> u8 {
        self.bytes[0]
    }

    pub fn humidity_frac(&self) -> u8 {
        self.bytes[1]
    }

    pub fn temp_int(&self) -> u8 {
        self.bytes[2]
    }

    pub fn temp_frac(&self) -> u8 {
        self.bytes[3]
    }

    pub fn checksum(&self) -> u8 {
        self.bytes[4]
    }

    /// Low byte of the sum of the four payload bytes.
    pub fn expected_checksum(&self) -> u8 {
        let sum: u16 = self.bytes[..4].iter().map(|&b| u16::from(b)).sum();
        (sum & 0xFF) as u8
    }

    /// Shift one bit into the current byte, MSB first.  Bits past the
    /// 40th are dropped.
    fn push_bit(&mut self, one: bool) {
        if self.bits >= FRAME_BITS {
            return;
        }
        let byte = &mut self.bytes[usize::from(self.bits / 8)];
        *byte = (*byte << 1) | u8::from(one);
        self.bits += 1;
    }

    /// Check length and checksum, then convert.
    ///
    /// `timed_out` selects between the two short-frame errors.
    pub fn validate(&self, timed_out: bool) -> Result<Reading, FrameError> {
        if self.bits < FRAME_BITS {
            return Err(if timed_out {
                FrameError::Timeout { bits: self.bits }
            } else {
                FrameError::InsufficientBits { bits: self.bits }
            });
        }
        if self.checksum() != self.expected_checksum() {
            return Err(FrameError::ChecksumMismatch {
                expected: self.expected_checksum(),
                actual: self.checksum(),
            });
        }
        Ok(self.to_reading())
    }

    /// Integer Celsius byte → °F; integer humidity byte → %.
    pub fn to_reading(&self) -> Reading {
        Reading {
            temperature_f: f64::from(self.temp_int()) * 9.0 / 5.0 + 32.0,
            humidity_percent: f64::from(self.humidity_int()),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// What a sampled transition means for the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// Line release and the sensor's 80 µs preamble.
    Header,
    /// Low gap before a data pulse.
    BitGap,
    /// High pulse whose width is the bit value.
    BitPulse,
}

impl Transition {
    fn at(index: usize) -> Self {
        if index < HEADER_TRANSITIONS {
            Self::Header
        } else if index % 2 == 0 {
            Self::BitPulse
        } else {
            Self::BitGap
        }
    }
}

/// Frame plus whether sampling stopped on a stuck line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub frame: RawFrame,
    pub timed_out: bool,
}

/// Runs one DHT11 exchange on a fixed data pin.
#[derive(Debug, Clone, Copy)]
pub struct SensorFrameDecoder {
    pin: u8,
}

impl SensorFrameDecoder {
    pub fn new(pin: u8) -> Self {
        Self { pin }
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Handshake, sample and validate.  Blocks for ~18.5 ms plus up to
    /// `MAX_TIMINGS * POLL_TIMEOUT` polls.
    pub fn decode(&self, hw: &mut impl HardwarePort) -> Result<Reading, FrameError> {
        let capture = self.capture(hw);
        let result = capture.frame.validate(capture.timed_out);
        match &result {
            Ok(r) => {
                let f = &capture.frame;
                debug!(
                    "DHT11: humidity = {}.{} % temperature = {}.{} C ({:.1} F)",
                    f.humidity_int(),
                    f.humidity_frac(),
                    f.temp_int(),
                    f.temp_frac(),
                    r.temperature_f
                );
            }
            Err(e) => debug!("DHT11: bad data ({}), skipping", e),
        }
        result
    }

    /// Handshake and sample without validating.
    pub fn capture(&self, hw: &mut impl HardwarePort) -> Capture {
        self.start_signal(hw);

        let mut frame = RawFrame::default();
        let mut last = PinState::High;
        let mut timed_out = false;

        for index in 0..MAX_TIMINGS {
            let mut count: u8 = 0;
            while hw.read_digital(self.pin) == last {
                count += 1;
                hw.delay_us(1);
                if count == POLL_TIMEOUT {
                    break;
                }
            }
            last = hw.read_digital(self.pin);

            if count == POLL_TIMEOUT {
                timed_out = true;
                break;
            }

            if Transition::at(index) == Transition::BitPulse {
                frame.push_bit(count > ONE_BIT_THRESHOLD);
            }
        }

        Capture { frame, timed_out }
    }

    fn start_signal(&self, hw: &mut impl HardwarePort) {
        hw.set_pin_mode(self.pin, PinMode::Output);
        hw.write_digital(self.pin, PinState::Low);
        hw.delay_ms(START_LOW_MS);
        hw.write_digital(self.pin, PinState::High);
        hw.delay_us(START_HIGH_US);
        hw.set_pin_mode(self.pin, PinMode::Input);
    }
}
