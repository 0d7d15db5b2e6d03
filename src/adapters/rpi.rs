//! Raspberry Pi hardware adapter.
//!
//! GPIO through `rppal`'s [`IoPin`] (the DHT11 line flips between output
//! and input every exchange) and an MCP3004 10-bit ADC on SPI0/CE0.
//!
//! ## Timing
//!
//! The DHT11 decoder counts `delay_us(1)` polls, so short delays must not
//! go through the scheduler: anything under a millisecond busy-waits on
//! the monotonic clock, longer delays sleep.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::{info, warn};
use rppal::gpio::{Gpio, IoPin, Level, Mode};
use rppal::spi::{self, Bus, SlaveSelect, Spi};

use crate::app::ports::{HardwarePort, PinMode};
use crate::config::SystemConfig;
use crate::error::{HwInitError, SensorError};
use crate::pins::{ADC_CHANNELS, ADC_SPI_CLOCK_HZ};

// ───────────────────────────────────────────────────────────────
// MCP3004
// ───────────────────────────────────────────────────────────────

/// Four-channel 10-bit SPI ADC.
pub struct Mcp3004 {
    spi: Spi,
}

impl Mcp3004 {
    pub fn open() -> Result<Self, HwInitError> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, ADC_SPI_CLOCK_HZ, spi::Mode::Mode0)
            .map_err(|e| HwInitError::Spi(e.to_string()))?;
        Ok(Self { spi })
    }

    /// Single-ended conversion: start bit, SGL=1 + channel, then clock out
    /// ten result bits.
    pub fn read(&mut self, channel: u8) -> Result<u16, SensorError> {
        if channel >= ADC_CHANNELS {
            return Err(SensorError::InvalidChannel(channel));
        }
        let tx = [0x01, (0x08 | channel) << 4, 0x00];
        let mut rx = [0u8; 3];
        self.spi.transfer(&mut rx, &tx).map_err(|e| {
            warn!("mcp3004: transfer on ch{} failed: {}", channel, e);
            SensorError::AdcReadFailed
        })?;
        Ok((u16::from(rx[1] & 0x03) << 8) | u16::from(rx[2]))
    }
}

// ───────────────────────────────────────────────────────────────
// RpiHardware
// ───────────────────────────────────────────────────────────────

pub struct RpiHardware {
    pins: HashMap<u8, IoPin>,
    adc: Mcp3004,
}

impl RpiHardware {
    /// Claim the four GPIOs named in `config` and open the ADC.
    pub fn open(config: &SystemConfig) -> Result<Self, HwInitError> {
        let gpio = Gpio::new().map_err(|e| HwInitError::Gpio(e.to_string()))?;
        let p = config.pins;
        let mut pins = HashMap::new();
        for (pin, mode) in [
            (p.relay, Mode::Output),
            (p.buzzer, Mode::Output),
            (p.water_light, Mode::Output),
            (p.dht, Mode::Input),
        ] {
            let io = gpio
                .get(pin)
                .map_err(|e| HwInitError::Pin {
                    pin,
                    reason: e.to_string(),
                })?
                .into_io(mode);
            pins.insert(pin, io);
        }
        let adc = Mcp3004::open()?;
        info!(
            "rpi: gpio {:?} claimed, mcp3004 on spi0/ce0 @ {} Hz",
            pins.keys().collect::<Vec<_>>(),
            ADC_SPI_CLOCK_HZ
        );
        Ok(Self { pins, adc })
    }
}

impl DelayNs for RpiHardware {
    fn delay_ns(&mut self, ns: u32) {
        let d = Duration::from_nanos(u64::from(ns));
        if d < Duration::from_millis(1) {
            let until = Instant::now() + d;
            while Instant::now() < until {
                std::hint::spin_loop();
            }
        } else {
            std::thread::sleep(d);
        }
    }
}

impl HardwarePort for RpiHardware {
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode) {
        if let Some(io) = self.pins.get_mut(&pin) {
            io.set_mode(match mode {
                PinMode::Input => Mode::Input,
                PinMode::Output => Mode::Output,
            });
        }
    }

    fn write_digital(&mut self, pin: u8, level: PinState) {
        if let Some(io) = self.pins.get_mut(&pin) {
            io.write(match level {
                PinState::High => Level::High,
                PinState::Low => Level::Low,
            });
        }
    }

    fn read_digital(&mut self, pin: u8) -> PinState {
        match self.pins.get(&pin).map(IoPin::read) {
            Some(Level::Low) => PinState::Low,
            _ => PinState::High,
        }
    }

    fn read_analog(&mut self, channel: u8) -> Result<u16, SensorError> {
        self.adc.read(channel)
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}
