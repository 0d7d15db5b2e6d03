//! Humidifier: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │  RpiHardware / SimHardware   LogEventSink   JsonFileConfig │
//! │  (HardwarePort)              (EventSink)    (ConfigPort)   │
//! │                                                            │
//! │  ────────────────── Port Trait Boundary ──────────────     │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │         HumidifierController (pure logic)            │  │
//! │  │  windows · hysteresis · water alarm · tick timer     │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exit status: 0 after a signal-initiated shutdown, 1 on any startup
//! failure (config, signal handler, hardware).
#![deny(unused_must_use)]

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use log::{error, info};
use signal_hook::consts::signal::{SIGINT, SIGTERM};

use humidifier::adapters::config_file::JsonFileConfig;
use humidifier::adapters::log_sink::LogEventSink;
use humidifier::app::ports::{ConfigPort, HardwarePort};
use humidifier::app::runtime;
use humidifier::config::SystemConfig;

fn main() -> ExitCode {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    info!("humidifier v{}", env!("CARGO_PKG_VERSION"));

    match start() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn start() -> Result<()> {
    // ── 2. Config ─────────────────────────────────────────────
    let config = JsonFileConfig::from_args_or_env(std::env::args().skip(1))
        .load()
        .context("loading configuration")?;

    // ── 3. Shutdown flag ──────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    for sig in [SIGINT, SIGTERM] {
        signal_hook::flag::register(sig, Arc::clone(&shutdown))
            .with_context(|| format!("installing handler for signal {sig}"))?;
    }

    // ── 4. Hardware ───────────────────────────────────────────
    let mut hw = open_hardware(&config).context("hardware initialisation failed")?;

    // ── 5. Control loop ───────────────────────────────────────
    let mut sink = LogEventSink::new();
    runtime::run(&config, &mut hw, &mut sink, &shutdown)?;
    Ok(())
}

#[cfg(all(target_os = "linux", feature = "rpi"))]
fn open_hardware(config: &SystemConfig) -> Result<impl HardwarePort> {
    Ok(humidifier::adapters::rpi::RpiHardware::open(config)?)
}

#[cfg(not(all(target_os = "linux", feature = "rpi")))]
fn open_hardware(config: &SystemConfig) -> Result<impl HardwarePort> {
    info!("no hardware backend compiled in, running the simulated room");
    Ok(humidifier::adapters::sim::SimHardware::new(config))
}
