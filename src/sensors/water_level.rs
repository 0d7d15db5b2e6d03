//! Resistive water-level probe on an MCP3004 channel.
//!
//! The raw 10-bit reading is squashed onto a rough 0–100 scale with
//! integer arithmetic (`raw * 100 / 1023 - 1`, so the range is really
//! -1..=99).  The threshold is expressed on this scale.
//!
//! Hysteresis comes from the caller's averaging window, not from here:
//! one dry sample moves the average by 1/N.

use crate::app::ports::HardwarePort;
use crate::control::window::SlidingWindow;
use crate::error::SensorError;
use crate::pins::ADC_MAX;

/// Averaged level (0–100 scale) below which the reservoir counts as empty.
pub const DEFAULT_WATER_THRESHOLD: f64 = 10.0;

/// `raw * 100 / 1023 - 1`, integer maths.
pub fn map_raw_level(raw: u16) -> i32 {
    i32::from(raw) * 100 / i32::from(ADC_MAX) - 1
}

pub struct WaterLevelMonitor {
    channel: u8,
    threshold: f64,
}

impl WaterLevelMonitor {
    pub fn new(channel: u8, threshold: f64) -> Self {
        Self { channel, threshold }
    }

    /// One mapped sample from the probe.
    pub fn sample(&self, hw: &mut impl HardwarePort) -> Result<f64, SensorError> {
        let raw = hw.read_analog(self.channel)?;
        if raw > ADC_MAX {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(f64::from(map_raw_level(raw)))
    }

    /// True iff the window's average is strictly below the threshold.
    pub fn is_out_of_water<const N: usize>(&self, window: &SlidingWindow<N>) -> bool {
        window.average() < self.threshold
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }
}
