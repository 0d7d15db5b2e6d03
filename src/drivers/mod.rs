//! Actuator drivers and output initialisation.

pub mod buzzer;
pub mod fan;
pub mod hw_init;
pub mod water_light;

pub use hw_init::Actuators;
