//! Control logic: smoothing windows, hysteresis decisions and the setpoint.

pub mod hysteresis;
pub mod setpoint;
pub mod window;
