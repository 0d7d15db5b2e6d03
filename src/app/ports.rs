//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ HumidifierController (domain)
//! ```
//!
//! Driven adapters (GPIO/ADC backends, event sinks, config files)
//! implement these traits.  The controller consumes them via generics, so
//! the domain core never touches hardware directly.

use std::time::Instant;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;

use crate::config::{ConfigError, SystemConfig};
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Hardware port (driven adapter: domain ↔ GPIO / ADC / clock)
// ───────────────────────────────────────────────────────────────

/// Direction of a GPIO line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    Input,
    Output,
}

/// Everything the control core needs from the board.
///
/// Delays come from [`DelayNs`]: `delay_ms` / `delay_us` are blocking and
/// stall the whole loop.  There is exactly one task.
/// The DHT11 decoder relies on `delay_us(1)` being the polling quantum.
pub trait HardwarePort: DelayNs {
    /// Switch a GPIO between input and output.
    fn set_pin_mode(&mut self, pin: u8, mode: PinMode);

    /// Drive an output pin.
    fn write_digital(&mut self, pin: u8, level: PinState);

    /// Sample a pin's current level.
    fn read_digital(&mut self, pin: u8) -> PinState;

    /// One 10-bit conversion (0–1023) on an ADC channel.
    fn read_analog(&mut self, channel: u8) -> Result<u16, SensorError>;

    /// Monotonic clock used to gate control ticks.
    fn now(&self) -> Instant;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The controller emits structured
/// [`ControllerEvent`](super::events::ControllerEvent)s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControllerEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ← config source)
// ───────────────────────────────────────────────────────────────

/// Loads system configuration at startup.
///
/// Implementations MUST validate before returning.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}
