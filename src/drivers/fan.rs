//! Fan relay driver.
//!
//! The relay board on the humidifier energises when its input is pulled
//! LOW, so "fan on" means driving the pin low.  The polarity is a config
//! flag; this driver translates logical on/off into the right level.
//!
//! ## Safety contract
//!
//! The fan must never run while the reservoir is dry.  That rule lives in
//! [`ControllerState::step`](crate::control::hysteresis::ControllerState::step);
//! this driver is a dumb actuator.

use embedded_hal::digital::PinState;

use crate::app::ports::{HardwarePort, PinMode};

pub struct FanRelay {
    pin: u8,
    active_low: bool,
    on: bool,
}

impl FanRelay {
    pub fn new(pin: u8, active_low: bool) -> Self {
        Self {
            pin,
            active_low,
            on: false,
        }
    }

    /// Make the pin an output and drive the inactive level.
    pub fn init(&mut self, hw: &mut impl HardwarePort) {
        hw.set_pin_mode(self.pin, PinMode::Output);
        self.set(hw, false);
    }

    pub fn set(&mut self, hw: &mut impl HardwarePort, on: bool) {
        hw.write_digital(self.pin, self.level_for(on));
        self.on = on;
    }

    /// Pin level that gives the requested relay state.
    pub fn level_for(&self, on: bool) -> PinState {
        PinState::from(on != self.active_low)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }
}
