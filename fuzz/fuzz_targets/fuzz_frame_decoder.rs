//! Fuzz target: `SensorFrameDecoder::decode`
//!
//! Turns arbitrary bytes into a DHT11 line: each byte is the width (in
//! polls) of one segment, levels alternating from high.  The decoder must
//! terminate, never report more than 40 bits, and only return a reading
//! for a frame whose checksum holds.
//!
//! cargo fuzz run fuzz_frame_decoder

#![no_main]

use std::time::Instant;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use humidifier::adapters::sim::Dht11Waveform;
use humidifier::app::ports::{HardwarePort, PinMode};
use humidifier::error::{FrameError, SensorError};
use humidifier::sensors::SensorFrameDecoder;
use libfuzzer_sys::fuzz_target;

struct Line {
    wave: Dht11Waveform,
    now_ns: u64,
    start_ns: Option<u64>,
    epoch: Instant,
}

impl DelayNs for Line {
    fn delay_ns(&mut self, ns: u32) {
        self.now_ns += u64::from(ns);
    }
}

impl HardwarePort for Line {
    fn set_pin_mode(&mut self, _pin: u8, mode: PinMode) {
        if mode == PinMode::Input {
            self.start_ns = Some(self.now_ns);
        }
    }
    fn write_digital(&mut self, _pin: u8, _level: PinState) {}
    fn read_digital(&mut self, _pin: u8) -> PinState {
        match self.start_ns {
            Some(start) => self.wave.level_at((self.now_ns - start) / 1000),
            None => PinState::High,
        }
    }
    fn read_analog(&mut self, channel: u8) -> Result<u16, SensorError> {
        Err(SensorError::InvalidChannel(channel))
    }
    fn now(&self) -> Instant {
        self.epoch
    }
}

fuzz_target!(|data: &[u8]| {
    let segments = data
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let level = if i % 2 == 0 { PinState::High } else { PinState::Low };
            (level, u32::from(w))
        })
        .collect();
    let mut line = Line {
        wave: Dht11Waveform::from_segments(segments),
        now_ns: 0,
        start_ns: None,
        epoch: Instant::now(),
    };

    let decoder = SensorFrameDecoder::new(16);
    let capture = decoder.capture(&mut line);
    assert!(capture.frame.bits <= 40, "frame overflowed five bytes");

    match capture.frame.validate(capture.timed_out) {
        Ok(_) => {
            assert_eq!(capture.frame.bits, 40);
            assert_eq!(capture.frame.checksum(), capture.frame.expected_checksum());
        }
        Err(FrameError::Timeout { bits }) | Err(FrameError::InsufficientBits { bits }) => {
            assert!(bits < 40);
        }
        Err(FrameError::ChecksumMismatch { expected, actual }) => {
            assert_ne!(expected, actual);
        }
    }
});
