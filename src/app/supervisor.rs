//! Composition root for the periodic tasks.
//!
//! ```text
//!  weight sensor ──▶ poll_weight ──────────┐
//!                                          ▼
//!                                    MetricStore ──▶ refresh_display ──▶ DisplayPort
//!                                          ▲
//!  temperature sensor ──▶ poll_temperature ┘
//! ```
//!
//! Adapters are handed over as factories.  Each factory runs once on its
//! task's own thread, after the real-time class is in place, so bus
//! handles and pins are opened by the thread that will use them.

use std::sync::Arc;

use anyhow::{Context, anyhow};
use log::{info, warn};

use super::calibration::CalibrationConstants;
use super::ports::{DisplayPort, SensorPort};
use super::status::format_status;
use super::store::MetricStore;
use crate::config::SystemConfig;
use crate::scheduler::{PeriodicTask, TaskRole, TaskSpec};
use crate::sensors::SensorReading;

/// Builds a sensor adapter on the task thread.
pub type SensorFactory = Box<dyn FnOnce() -> crate::Result<Box<dyn SensorPort>> + Send>;
/// Builds the display adapter on the task thread.  Failure is fatal.
pub type DisplayFactory = Box<dyn FnOnce() -> crate::Result<Box<dyn DisplayPort>> + Send>;

// ── Task bodies ───────────────────────────────────────────────

/// One temperature period: read, scale to °C, publish.
pub fn poll_temperature(sensor: &mut dyn SensorPort, store: &MetricStore, scale: f64) -> SensorReading {
    let reading = sensor.read().map(|raw| raw / scale);
    store.set_temperature(reading);
    reading
}

/// One weight period: read, publish.  The raw value is stored as-is.
pub fn poll_weight(sensor: &mut dyn SensorPort, store: &MetricStore) -> SensorReading {
    let reading = sensor.read();
    store.set_weight(reading);
    reading
}

/// One display period: snapshot both cells, derive the fill level, redraw.
pub fn refresh_display(
    display: &mut dyn DisplayPort,
    store: &MetricStore,
    calibration: &CalibrationConstants,
) -> String {
    let temperature = store.temperature();
    let weight = store.weight();
    let fill = calibration.percentage(weight);
    let line = format_status(temperature, fill);

    info!(
        "STATUS | temp={:.1} weight={:.1} fill={:.1}",
        temperature.to_raw(),
        weight.to_raw(),
        fill.to_raw()
    );
    display.show(&line);
    line
}

/// Logs when a source flips between valid and invalid, not every period.
struct ValidityLog {
    source: &'static str,
    valid: Option<bool>,
}

impl ValidityLog {
    fn new(source: &'static str) -> Self {
        Self { source, valid: None }
    }

    fn observe(&mut self, reading: SensorReading) {
        let now = reading.is_valid();
        if self.valid == Some(now) {
            return;
        }
        match (self.valid, now) {
            (_, false) => warn!("{}: reading invalid", self.source),
            (Some(false), true) => info!("{}: reading valid again", self.source),
            (None, true) => info!("{}: first reading {:.1}", self.source, reading.to_raw()),
            (Some(true), true) => {}
        }
        self.valid = Some(now);
    }
}

// ── Supervisor ────────────────────────────────────────────────

pub struct Supervisor {
    config: SystemConfig,
    calibration: CalibrationConstants,
    store: Arc<MetricStore>,
    weight: SensorFactory,
    temperature: SensorFactory,
    display: DisplayFactory,
}

impl Supervisor {
    pub fn new(
        config: SystemConfig,
        calibration: CalibrationConstants,
        weight: SensorFactory,
        temperature: SensorFactory,
        display: DisplayFactory,
    ) -> Self {
        Self {
            config,
            calibration,
            store: Arc::new(MetricStore::new()),
            weight,
            temperature,
            display,
        }
    }

    /// Shared store the tasks publish into.
    pub fn store(&self) -> Arc<MetricStore> {
        Arc::clone(&self.store)
    }

    /// Validate the configuration, then spawn all three tasks and wait
    /// until each reports ready.
    ///
    /// An invalid configuration starts nothing.  Otherwise the first setup
    /// failure is returned; tasks that already started keep running until
    /// the process exits.
    pub fn start(self) -> anyhow::Result<RunningTasks> {
        self.config
            .validate()
            .map_err(crate::Error::from)
            .context("validating configuration")?;

        let Self {
            config,
            calibration,
            store,
            weight,
            temperature,
            display,
        } = self;
        let realtime = config.require_realtime;
        let mut tasks = Vec::with_capacity(TaskRole::ALL.len());

        let scale = config.temperature_scale;
        let temp_store = Arc::clone(&store);
        tasks.push(
            PeriodicTask::spawn(
                TaskSpec::for_role(TaskRole::Temperature, &config),
                realtime,
                move || {
                    let mut sensor = temperature()?;
                    let mut log = ValidityLog::new("temperature");
                    Ok(move || log.observe(poll_temperature(sensor.as_mut(), &temp_store, scale)))
                },
            )
            .context("starting temperature task")?,
        );

        let display_store = Arc::clone(&store);
        tasks.push(
            PeriodicTask::spawn(TaskSpec::for_role(TaskRole::Display, &config), realtime, move || {
                let mut display = display()?;
                Ok(move || {
                    refresh_display(display.as_mut(), &display_store, &calibration);
                })
            })
            .context("starting display task")?,
        );

        let weight_store = Arc::clone(&store);
        tasks.push(
            PeriodicTask::spawn(TaskSpec::for_role(TaskRole::Weight, &config), realtime, move || {
                let mut sensor = weight()?;
                let mut log = ValidityLog::new("weight");
                Ok(move || log.observe(poll_weight(sensor.as_mut(), &weight_store)))
            })
            .context("starting weight task")?,
        );

        info!("All {} tasks running", tasks.len());
        Ok(RunningTasks { tasks })
    }

    /// Start the tasks and block on them.  Does not return while they run.
    pub fn run(self) -> anyhow::Result<()> {
        self.start()?.join()
    }
}

/// Handles of the started tasks.
pub struct RunningTasks {
    tasks: Vec<PeriodicTask>,
}

impl RunningTasks {
    pub fn specs(&self) -> Vec<TaskSpec> {
        self.tasks.iter().map(PeriodicTask::spec).collect()
    }

    /// Join every task.  A task only ends by panicking, which is an error.
    pub fn join(self) -> anyhow::Result<()> {
        for task in self.tasks {
            let name = task.spec().name;
            task.join().map_err(|_| anyhow!("task '{}' panicked", name))?;
        }
        Ok(())
    }
}
