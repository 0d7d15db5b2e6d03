//! One-shot output configuration and the matching safe shutdown.
//!
//! Called once after the hardware adapter is open and before the
//! baseline read.  Every output ends up in its idle level: fan relay
//! released, buzzer low, indicator dark.

use log::info;

use crate::app::ports::HardwarePort;
use crate::config::SystemConfig;
use crate::drivers::buzzer::Buzzer;
use crate::drivers::fan::FanRelay;
use crate::drivers::water_light::WaterLight;

/// The three actuators, owned together so shutdown can't miss one.
pub struct Actuators {
    pub fan: FanRelay,
    pub buzzer: Buzzer,
    pub water_light: WaterLight,
}

impl Actuators {
    /// Build the drivers from config without touching the hardware.
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            fan: FanRelay::new(config.pins.relay, config.relay_active_low),
            buzzer: Buzzer::new(config.pins.buzzer),
            water_light: WaterLight::new(config.pins.water_light),
        }
    }

    /// Set every output's direction and drive it to its idle level.
    pub fn init(&mut self, hw: &mut impl HardwarePort) {
        self.fan.init(hw);
        self.buzzer.init(hw);
        self.water_light.init(hw);
        info!(
            "hw_init: outputs configured (relay={} buzzer={} light={})",
            self.fan.pin(),
            self.buzzer.pin(),
            self.water_light.pin()
        );
    }

    /// Fan off, buzzer low, indicator off.
    pub fn all_off(&mut self, hw: &mut impl HardwarePort) {
        self.fan.set(hw, false);
        self.buzzer.silence(hw);
        self.water_light.set(hw, false);
    }
}
