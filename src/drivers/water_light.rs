//! Low-water indicator LED (active high).

use embedded_hal::digital::PinState;

use crate::app::ports::{HardwarePort, PinMode};

pub struct WaterLight {
    pin: u8,
    lit: bool,
}

impl WaterLight {
    pub fn new(pin: u8) -> Self {
        Self { pin, lit: false }
    }

    pub fn init(&mut self, hw: &mut impl HardwarePort) {
        hw.set_pin_mode(self.pin, PinMode::Output);
        self.set(hw, false);
    }

    pub fn set(&mut self, hw: &mut impl HardwarePort, lit: bool) {
        hw.write_digital(self.pin, PinState::from(lit));
        self.lit = lit;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }
}
