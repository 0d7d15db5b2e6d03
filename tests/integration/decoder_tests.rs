//! DHT11 decoding through the public API: handshake, synthesized
//! waveforms, and every failure path.

use embedded_hal::digital::PinState;

use humidifier::adapters::sim::{Dht11Waveform, ONE_POLLS, ZERO_POLLS};
use humidifier::app::ports::PinMode;
use humidifier::error::FrameError;
use humidifier::sensors::{Reading, SensorFrameDecoder};
use humidifier::sensors::dht11::ONE_BIT_THRESHOLD;

use crate::mock_hw::{HwCall, MockHardware};

const DHT: u8 = 16;

fn decode(hw: &mut MockHardware) -> Result<Reading, FrameError> {
    SensorFrameDecoder::new(DHT).decode(hw)
}

#[test]
fn handshake_pulls_low_then_releases() {
    let mut hw = MockHardware::new();
    decode(&mut hw).unwrap();
    let dht_calls: Vec<HwCall> = hw
        .calls
        .iter()
        .copied()
        .filter(|c| matches!(c, HwCall::Mode { pin: DHT, .. } | HwCall::Write { pin: DHT, .. }))
        .collect();
    assert_eq!(
        dht_calls,
        vec![
            HwCall::Mode {
                pin: DHT,
                mode: PinMode::Output
            },
            HwCall::Write {
                pin: DHT,
                level: PinState::Low
            },
            HwCall::Write {
                pin: DHT,
                level: PinState::High
            },
            HwCall::Mode {
                pin: DHT,
                mode: PinMode::Input
            },
        ]
    );
}

#[test]
fn integer_bytes_become_the_reading() {
    let mut hw = MockHardware::new();
    hw.set_reading(63, 25);
    let r = decode(&mut hw).unwrap();
    assert_eq!(r.humidity_percent, 63.0);
    assert_eq!(r.temperature_f, 77.0);
}

#[test]
fn fractional_bytes_do_not_reach_the_reading() {
    let mut hw = MockHardware::new();
    hw.set_frame(Dht11Waveform::from_bytes([50, 7, 22, 9, 88]));
    let r = decode(&mut hw).unwrap();
    assert_eq!(r.humidity_percent, 50.0);
    assert_eq!(r.temperature_f, 22.0 * 9.0 / 5.0 + 32.0);
}

#[test]
fn each_handshake_consumes_one_scripted_frame() {
    let mut hw = MockHardware::new();
    hw.push_frame(Dht11Waveform::from_reading(41, 20));
    hw.push_frame(Dht11Waveform::silent());
    assert_eq!(decode(&mut hw).unwrap().humidity_percent, 41.0);
    assert_eq!(decode(&mut hw), Err(FrameError::Timeout { bits: 0 }));
    assert_eq!(decode(&mut hw).unwrap().humidity_percent, 50.0);
}

#[test]
fn corrupted_checksum_is_reported() {
    let mut hw = MockHardware::new();
    let mut bytes = Dht11Waveform::frame_bytes(45, 21);
    bytes[4] ^= 0x80;
    hw.set_frame(Dht11Waveform::from_bytes(bytes));
    assert_eq!(
        decode(&mut hw),
        Err(FrameError::ChecksumMismatch {
            expected: 66,
            actual: 66 ^ 0x80
        })
    );
}

#[test]
fn sensor_stopping_mid_frame_times_out_with_partial_bits() {
    let mut hw = MockHardware::new();
    // Header, 20 bits, then the gap before bit 21; the line then idles high.
    hw.set_frame(Dht11Waveform::from_reading(45, 21).truncated(3 + 2 * 20 + 1));
    assert_eq!(decode(&mut hw), Err(FrameError::Timeout { bits: 20 }));
}

#[test]
fn pulse_exactly_at_threshold_reads_as_zero() {
    let mut hw = MockHardware::new();
    let at = u32::from(ONE_BIT_THRESHOLD);
    hw.set_frame(Dht11Waveform::with_pulse_widths([0xFF; 5], ZERO_POLLS, at));
    // Every bit reads 0, and an all-zero frame carries a valid checksum.
    assert_eq!(
        decode(&mut hw),
        Ok(Reading {
            temperature_f: 32.0,
            humidity_percent: 0.0
        })
    );
}

#[test]
fn pulse_one_poll_past_threshold_reads_as_one() {
    let mut hw = MockHardware::new();
    let past = u32::from(ONE_BIT_THRESHOLD) + 1;
    hw.set_frame(Dht11Waveform::with_pulse_widths(
        Dht11Waveform::frame_bytes(60, 30),
        ZERO_POLLS,
        past,
    ));
    assert_eq!(decode(&mut hw).unwrap().humidity_percent, 60.0);
}

#[test]
fn default_pulse_widths_straddle_the_threshold() {
    assert!(u32::from(ONE_BIT_THRESHOLD) >= ZERO_POLLS);
    assert!(u32::from(ONE_BIT_THRESHOLD) < ONE_POLLS);
}
