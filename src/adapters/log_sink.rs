//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing controller events through the
//! `log` facade.  The binary routes that into `tracing-subscriber`, so
//! the output lands on stderr with timestamps and levels.

use log::{debug, info, warn};

use crate::app::events::ControllerEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControllerEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControllerEvent) {
        match event {
            ControllerEvent::Status(s) => {
                info!(
                    "STATUS | target={:.0}% | RH={:.1}% | T={:.1}\u{00b0}F | water={:.1} ({}) | \
                     fan={} | frames ok/bad={}/{} water_err={}",
                    s.set_humidity,
                    s.avg_humidity,
                    s.avg_temperature_f,
                    s.avg_water,
                    if s.out_of_water { "EMPTY" } else { "OK" },
                    if s.fan_on { "ON" } else { "OFF" },
                    s.counters.frames_ok,
                    s.counters.frames_failed,
                    s.counters.water_failed,
                );
            }
            ControllerEvent::FanChanged { on, avg_humidity } => {
                info!(
                    "FAN | {} (avg RH {:.2}%)",
                    if *on { "on" } else { "off" },
                    avg_humidity
                );
            }
            ControllerEvent::WaterEmpty { avg_water } => {
                warn!("WATER | reservoir empty (avg {:.1}), fan held off", avg_water);
            }
            ControllerEvent::WaterRestored { avg_water } => {
                info!("WATER | reservoir refilled (avg {:.1})", avg_water);
            }
            ControllerEvent::ReadingSkipped(e) => {
                debug!("DHT11 | reading skipped: {}", e);
            }
            ControllerEvent::WaterSampleFailed(e) => {
                debug!("WATER | sample skipped: {}", e);
            }
            ControllerEvent::BaselineRetry { attempt } => {
                info!("BASELINE | attempt {} failed, retrying", attempt);
            }
            ControllerEvent::BaselineAcquired {
                reading,
                water_level,
            } => {
                info!(
                    "BASELINE | RH={:.0}% T={:.1}\u{00b0}F water={:.0}",
                    reading.humidity_percent, reading.temperature_f, water_level
                );
            }
            ControllerEvent::Started { set_humidity } => {
                info!("START | target={:.0}%", set_humidity);
            }
            ControllerEvent::Stopped => {
                info!("STOP | outputs idle");
            }
        }
    }
}
