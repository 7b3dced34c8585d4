//! kegstatus: keg fill level and temperature on an I²C character LCD.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                    Start-up (main thread)                      │
//! │                                                                │
//! │  env_logger · JsonFileConfig · OperatorPrompt · SysfsGpio      │
//! │  ctrlc handler                                                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │  Supervisor                                            │    │
//! │  │  weight-poll 1 s · display-refresh 3 s · temp-poll 5 s │    │
//! │  │            └──── Arc<MetricStore> ────┘                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use log::{error, info};

use kegstatus::adapters::config_file::{JsonFileConfig, load_or_default};
use kegstatus::adapters::hardware;
use kegstatus::adapters::operator::OperatorPrompt;
use kegstatus::adapters::sysfs_gpio::{Direction, SysfsGpio};
use kegstatus::app::supervisor::Supervisor;
use kegstatus::config::WeightSourceKind;

fn main() -> ExitCode {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    ExitCode::from(exit_status(run()))
}

/// Reports a fatal error once, through the logger, and maps it to the
/// process status.
fn exit_status(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("Fatal: {:#}", e);
            1
        }
    }
}

fn run() -> Result<()> {
    info!("╔══════════════════════════════════════╗");
    info!("║  kegstatus v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config_port = JsonFileConfig::from_env();
    let config = load_or_default(&config_port)
        .with_context(|| format!("loading {}", config_port.path().display()))?;
    info!(
        "Config: bus={} addr=0x{:02x} periods={}/{}/{}ms weight_source={:?} realtime={}",
        config.i2c_bus.display(),
        config.display_address,
        config.weight_period_ms,
        config.display_period_ms,
        config.temperature_period_ms,
        config.weight_source,
        if config.require_realtime { "required" } else { "best-effort" },
    );

    // ── 3. Operator inputs ────────────────────────────────────
    let inputs = OperatorPrompt::new(std::io::stdin().lock(), std::io::stdout())
        .weight_source(config.weight_source)
        .collect()
        .context("reading operator input")?;
    info!(
        "Weight GPIOs {:?}, temperature id {}, empty {:.0}, full {:.0}",
        inputs.weight_gpios,
        inputs.temperature_id,
        inputs.calibration.empty_weight,
        inputs.calibration.full_weight
    );

    // ── 4. GPIO preparation ───────────────────────────────────
    let gpio = SysfsGpio::new(&config.gpio_root);
    let [first, second] = inputs.weight_gpios;
    let second_direction = match config.weight_source {
        WeightSourceKind::ValueFile => Direction::In,
        WeightSourceKind::Hx711 => Direction::Out,
    };
    gpio.prepare(first, Direction::In)
        .and_then(|()| gpio.prepare(second, second_direction))
        .context("preparing weight sensor GPIOs")?;

    // ── 5. Termination ────────────────────────────────────────
    // The display task's thread owns the LCD and tasks have no cancellation
    // point, so the handler cannot reach `Lcd::close`.  The panel keeps its
    // last frame after exit; the kernel releases the bus handle.
    ctrlc::set_handler(|| {
        info!("Caught termination signal, shutting down");
        std::process::exit(0);
    })
    .context("installing signal handler")?;

    // ── 6. Periodic tasks ─────────────────────────────────────
    let supervisor = Supervisor::new(
        config.clone(),
        inputs.calibration,
        hardware::weight_factory(&config, inputs.weight_gpios),
        hardware::temperature_factory(&config),
        hardware::display_factory(&config),
    );

    supervisor.run()
}
