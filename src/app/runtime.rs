//! Startup and the cooperative control loop.
//!
//! ```text
//!  outputs idle ─▶ baseline (retry) ─▶ ┌─ read setpoint ◀──────┐
//!                                      │  sleep poll interval   │
//!                                      │  controller.poll()  ───┘
//!                                      └─ shutdown flag ─▶ outputs idle
//! ```
//!
//! Everything runs on the caller's thread.  The only shared state is the
//! shutdown flag, set from a signal handler and read between iterations.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

use crate::config::SystemConfig;
use crate::control::setpoint::DEFAULT_SETPOINT;
use crate::drivers::Actuators;
use crate::error::Result;
use crate::sensors::{Reading, SensorFrameDecoder, WaterLevelMonitor};

use super::controller::HumidifierController;
use super::events::ControllerEvent;
use super::ports::{EventSink, HardwarePort};

/// Loop until a water sample and a DHT11 frame both succeed in the same
/// attempt.  Returns `None` if shutdown was requested first.
pub fn acquire_baseline(
    config: &SystemConfig,
    hw: &mut impl HardwarePort,
    sink: &mut impl EventSink,
    shutdown: &AtomicBool,
) -> Option<(Reading, f64)> {
    let decoder = SensorFrameDecoder::new(config.pins.dht);
    let monitor = WaterLevelMonitor::new(config.water_adc_channel, config.water_threshold);
    let mut attempt = 0u32;

    while !shutdown.load(Ordering::Relaxed) {
        attempt += 1;
        let water = monitor.sample(hw);
        let reading = decoder.decode(hw);
        hw.delay_ms(config.post_read_settle_ms);

        match (reading, water) {
            (Ok(reading), Ok(level)) => return Some((reading, level)),
            (reading, water) => {
                debug!(
                    "baseline attempt {} failed (frame: {:?}, water: {:?})",
                    attempt,
                    reading.err(),
                    water.err()
                );
                sink.emit(&ControllerEvent::BaselineRetry { attempt });
                hw.delay_ms(config.baseline_retry_ms);
            }
        }
    }
    None
}

/// Configure outputs, take a baseline and run the control loop until
/// `shutdown` is set.  Outputs are idle on return.
pub fn run(
    config: &SystemConfig,
    hw: &mut impl HardwarePort,
    sink: &mut impl EventSink,
    shutdown: &AtomicBool,
) -> Result<()> {
    config.validate()?;

    let mut actuators = Actuators::from_config(config);
    actuators.init(hw);

    let Some((reading, water_level)) = acquire_baseline(config, hw, sink, shutdown) else {
        info!("shutdown requested before baseline");
        actuators.all_off(hw);
        sink.emit(&ControllerEvent::Stopped);
        return Ok(());
    };
    sink.emit(&ControllerEvent::BaselineAcquired {
        reading,
        water_level,
    });

    let set_humidity = config.setpoint.read(hw).unwrap_or(DEFAULT_SETPOINT);
    let mut controller = HumidifierController::with_baseline(
        config.clone(),
        actuators,
        set_humidity,
        reading,
        water_level,
        &*hw,
    );
    sink.emit(&ControllerEvent::Started { set_humidity });

    while !shutdown.load(Ordering::Relaxed) {
        if let Some(target) = config.setpoint.read(hw) {
            controller.set_target(target);
        }
        hw.delay_ms(config.poll_interval_ms);
        controller.poll(hw, sink);
    }

    controller.shutdown(hw);
    sink.emit(&ControllerEvent::Stopped);
    Ok(())
}
