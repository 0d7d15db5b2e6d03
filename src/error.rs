//! Unified error types for the humidifier controller.
//!
//! A single `Error` enum that every subsystem converts into, so the binary
//! boundary handles startup failures uniformly.  Control-loop errors
//! ([`FrameError`], [`SensorError`]) never reach it at runtime: the
//! controller skips that tick's update and carries on.

use core::fmt;

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// GPIO / SPI could not be brought up.  Fatal.
    HardwareInit(HwInitError),
    /// An analog read failed.
    Sensor(SensorError),
    /// A DHT11 exchange produced no usable frame.
    Frame(FrameError),
    /// Configuration is missing fields, malformed, or out of range.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardwareInit(e) => write!(f, "hardware init: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Frame(e) => write!(f, "frame: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Hardware initialisation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwInitError {
    /// The GPIO character device / register map could not be opened.
    Gpio(String),
    /// A specific pin could not be claimed.
    Pin { pin: u8, reason: String },
    /// The SPI bus carrying the ADC could not be opened.
    Spi(String),
}

impl fmt::Display for HwInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpio(msg) => write!(f, "GPIO setup failed: {msg}"),
            Self::Pin { pin, reason } => write!(f, "GPIO {pin} unavailable: {reason}"),
            Self::Spi(msg) => write!(f, "SPI setup failed: {msg}"),
        }
    }
}

impl std::error::Error for HwInitError {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::HardwareInit(e)
    }
}

// ---------------------------------------------------------------------------
// Analog sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The ADC transfer failed or returned garbage.
    AdcReadFailed,
    /// The requested channel does not exist on the ADC.
    InvalidChannel(u8),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::InvalidChannel(ch) => write!(f, "no such ADC channel {ch}"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// DHT11 framing errors
// ---------------------------------------------------------------------------

/// Why a DHT11 exchange did not yield a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// A level held for 255 polls before 40 bits were collected.
    Timeout { bits: u8 },
    /// Every transition was sampled but fewer than 40 were data bits.
    InsufficientBits { bits: u8 },
    /// 40 bits arrived but the checksum byte disagrees with the payload.
    ChecksumMismatch { expected: u8, actual: u8 },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout { bits } => write!(f, "line timed out after {bits} bits"),
            Self::InsufficientBits { bits } => write!(f, "only {bits} of 40 bits received"),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "checksum mismatch (expected 0x{expected:02X}, got 0x{actual:02X})"
            ),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Self::Frame(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
