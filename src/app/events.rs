//! Outbound controller events.
//!
//! The [`HumidifierController`](super::controller::HumidifierController)
//! and the [`runtime`](super::runtime) loop emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the stock one writes them to the log.

use crate::error::{FrameError, SensorError};
use crate::sensors::Reading;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// Control loop entered; carries the initial target humidity.
    Started { set_humidity: f64 },

    /// First good reading; every window has been filled with it.
    BaselineAcquired { reading: Reading, water_level: f64 },

    /// Baseline attempt failed; will retry after the configured delay.
    BaselineRetry { attempt: u32 },

    /// DHT11 exchange produced nothing usable this tick.
    ReadingSkipped(FrameError),

    /// Water probe could not be sampled this tick.
    WaterSampleFailed(SensorError),

    /// The fan relay was switched.
    FanChanged { on: bool, avg_humidity: f64 },

    /// Averaged water level fell below the threshold.
    WaterEmpty { avg_water: f64 },

    /// Averaged water level is back at or above the threshold.
    WaterRestored { avg_water: f64 },

    /// Periodic status snapshot, one per tick.
    Status(StatusLine),

    /// Control loop left; outputs are idle.
    Stopped,
}

/// A point-in-time snapshot suitable for a one-line status print.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusLine {
    pub set_humidity: f64,
    pub avg_humidity: f64,
    pub avg_temperature_f: f64,
    pub avg_water: f64,
    pub fan_on: bool,
    pub out_of_water: bool,
    pub counters: Counters,
}

/// Running totals since start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub ticks: u32,
    pub frames_ok: u32,
    pub frames_failed: u32,
    pub water_failed: u32,
}
