//! Sensor subsystem: the DHT11 frame decoder and the water-level probe.

pub mod dht11;
pub mod water_level;

pub use dht11::{RawFrame, Reading, SensorFrameDecoder};
pub use water_level::WaterLevelMonitor;
