//! Humidifier control library.
//!
//! Exposes the control core, sensor decoders and adapters for the binary
//! and for integration testing.  Real GPIO lives behind the `rpi` feature
//! in [`adapters::rpi`]; everything else runs on any host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod timer;
