//! Application core.
//!
//! The control rules for the humidifier: tick orchestration, baseline
//! acquisition and the cooperative loop.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod controller;
pub mod events;
pub mod ports;
pub mod runtime;
