//! System configuration parameters
//!
//! All tunable parameters for the humidifier.  Values come from
//! [`SystemConfig::default()`] unless a JSON file overrides them (see
//! [`JsonFileConfig`](crate::adapters::config_file::JsonFileConfig)).
//! Nothing is ever written back.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::control::hysteresis::DEFAULT_TOLERANCE;
use crate::control::setpoint::SetpointSource;
use crate::pins;
use crate::sensors::water_level::DEFAULT_WATER_THRESHOLD;

/// Output/input pin assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    /// Fan relay.
    pub relay: u8,
    /// DHT11 data line.
    pub dht: u8,
    /// Alarm buzzer.
    pub buzzer: u8,
    /// Low-water LED.
    pub water_light: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            relay: pins::RELAY_GPIO,
            dht: pins::DHT_GPIO,
            buzzer: pins::BUZZER_GPIO,
            water_light: pins::WATER_LED_GPIO,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Wiring ---
    pub pins: PinConfig,
    /// Relay energises (fan runs) when its pin is driven LOW.
    pub relay_active_low: bool,
    /// ADC channel of the water-level probe.
    pub water_adc_channel: u8,

    // --- Control ---
    /// Where the target humidity comes from.
    pub setpoint: SetpointSource,
    /// Dead-band below the setpoint before the fan starts.
    pub tolerance: f64,
    /// Averaged water level (0–100 scale) below which the tank is empty.
    pub water_threshold: f64,

    // --- Timing ---
    /// Control tick period (milliseconds)
    pub tick_interval_ms: u32,
    /// Inner loop period: setpoint re-read (milliseconds)
    pub poll_interval_ms: u32,
    /// Wait between failed baseline reads (milliseconds)
    pub baseline_retry_ms: u32,
    /// Line settle time after each DHT11 exchange (milliseconds)
    pub post_read_settle_ms: u32,

    // --- Alarm ---
    /// Beeps sounded when the tank runs dry.
    pub alarm_repetitions: u32,
    /// Half-period of each beep (milliseconds)
    pub alarm_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            pins: PinConfig::default(),
            relay_active_low: true,
            water_adc_channel: pins::WATER_ADC_CHANNEL,

            setpoint: SetpointSource::default(),
            tolerance: DEFAULT_TOLERANCE,
            water_threshold: DEFAULT_WATER_THRESHOLD,

            tick_interval_ms: 2000,
            poll_interval_ms: 100,
            baseline_retry_ms: 2000,
            post_read_settle_ms: 20,

            alarm_repetitions: 10,
            alarm_interval_ms: 150,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_interval_ms must be > 0"));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("poll_interval_ms must be > 0"));
        }
        if !(self.tolerance >= 0.0 && self.tolerance.is_finite()) {
            return Err(ConfigError::ValidationFailed("tolerance must be finite and >= 0"));
        }
        if !(0.0..=100.0).contains(&self.water_threshold) {
            return Err(ConfigError::ValidationFailed("water_threshold must be within 0..=100"));
        }
        if self.water_adc_channel >= pins::ADC_CHANNELS {
            return Err(ConfigError::ValidationFailed("water_adc_channel out of range"));
        }
        match self.setpoint {
            SetpointSource::Fixed(v) if !(0.0..=100.0).contains(&v) => {
                return Err(ConfigError::ValidationFailed("fixed setpoint must be within 0..=100"));
            }
            SetpointSource::Dial { channel } if channel >= pins::ADC_CHANNELS => {
                return Err(ConfigError::ValidationFailed("dial channel out of range"));
            }
            _ => {}
        }
        if self.alarm_repetitions > 0 && self.alarm_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("alarm_interval_ms must be > 0"));
        }

        let p = self.pins;
        let all = [p.relay, p.dht, p.buzzer, p.water_light];
        for (i, a) in all.iter().enumerate() {
            if all[i + 1..].contains(a) {
                return Err(ConfigError::ValidationFailed("pin assigned twice"));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from [`ConfigPort`](crate::app::ports::ConfigPort) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found at the expected location.
    NotFound,
    /// The file could not be read or parsed.
    Parse(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Parse(msg) => write!(f, "config unreadable: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
