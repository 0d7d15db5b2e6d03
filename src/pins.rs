//! GPIO / ADC assignments for the humidifier board (BCM numbering).
//!
//! These are the defaults baked into [`SystemConfig`](crate::config::SystemConfig);
//! a config file can move any of them.

// ---------------------------------------------------------------------------
// Actuators
// ---------------------------------------------------------------------------

/// 5 V relay module switching the fan.  Active LOW.
pub const RELAY_GPIO: u8 = 14;
/// Piezo buzzer for the low-water alarm.
pub const BUZZER_GPIO: u8 = 18;
/// Low-water indicator LED.  HIGH = lit.
pub const WATER_LED_GPIO: u8 = 21;

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line.
pub const DHT_GPIO: u8 = 16;

/// MCP3004 channel wired to the water-level probe.
pub const WATER_ADC_CHANNEL: u8 = 1;
/// MCP3004 channel a setpoint potentiometer is usually wired to.
pub const DIAL_ADC_CHANNEL: u8 = 0;

// ---------------------------------------------------------------------------
// MCP3004 on SPI0
// ---------------------------------------------------------------------------

/// Number of single-ended inputs on the MCP3004.
pub const ADC_CHANNELS: u8 = 4;
/// Full-scale 10-bit reading.
pub const ADC_MAX: u16 = 1023;
/// SPI clock for the ADC.
pub const ADC_SPI_CLOCK_HZ: u32 = 1_000_000;
