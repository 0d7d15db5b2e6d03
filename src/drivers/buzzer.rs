//! Piezo buzzer.  One blocking alarm pattern, nothing else.

use embedded_hal::digital::PinState;

use crate::app::ports::{HardwarePort, PinMode};

pub struct Buzzer {
    pin: u8,
}

impl Buzzer {
    pub fn new(pin: u8) -> Self {
        Self { pin }
    }

    pub fn init(&mut self, hw: &mut impl HardwarePort) {
        hw.set_pin_mode(self.pin, PinMode::Output);
        self.silence(hw);
    }

    /// `repetitions` × {high, wait, low, wait}.  Blocks the loop for
    /// `2 * repetitions * interval_ms`.
    pub fn sound_alarm(&mut self, hw: &mut impl HardwarePort, repetitions: u32, interval_ms: u32) {
        for _ in 0..repetitions {
            hw.write_digital(self.pin, PinState::High);
            hw.delay_ms(interval_ms);
            hw.write_digital(self.pin, PinState::Low);
            hw.delay_ms(interval_ms);
        }
    }

    pub fn silence(&mut self, hw: &mut impl HardwarePort) {
        hw.write_digital(self.pin, PinState::Low);
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }
}
