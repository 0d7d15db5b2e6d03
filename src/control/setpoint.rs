//! Target-humidity source, re-read on every pass of the inner loop.

use serde::{Deserialize, Serialize};

use crate::app::ports::HardwarePort;
use crate::pins::ADC_MAX;

/// Target humidity (%) when nothing better is known.
pub const DEFAULT_SETPOINT: f64 = 50.0;

/// Where the target humidity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetpointSource {
    /// A constant target (%).
    Fixed(f64),
    /// A potentiometer on an ADC channel, full scale = 100 %.
    Dial { channel: u8 },
}

impl Default for SetpointSource {
    fn default() -> Self {
        Self::Fixed(DEFAULT_SETPOINT)
    }
}

impl SetpointSource {
    /// Current target, or `None` if the dial could not be read.
    pub fn read(&self, hw: &mut impl HardwarePort) -> Option<f64> {
        match *self {
            Self::Fixed(v) => Some(v),
            Self::Dial { channel } => match hw.read_analog(channel) {
                Ok(raw) => Some(f64::from(raw.min(ADC_MAX)) * 100.0 / f64::from(ADC_MAX)),
                Err(e) => {
                    log::debug!("setpoint dial read failed: {}", e);
                    None
                }
            },
        }
    }
}
