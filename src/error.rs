//! Unified error types for the keg monitor.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! supervisor and `main()` handle failures uniformly.  Sensor read failures
//! are absent: they never propagate and are folded into
//! [`SensorReading::Invalid`](crate::sensors::SensorReading::Invalid) at the
//! point of reading.

use core::fmt;

use crate::app::ports::ConfigError;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation outside the sensor read path funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The display bus could not be opened or used.
    Bus(BusError),
    /// A periodic task could not be scheduled.
    Sched(SchedError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// A sysfs GPIO could not be prepared.
    Gpio(GpioError),
    /// The named hardware path does not exist on this build target.
    Unsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Sched(e) => write!(f, "sched: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Gpio(e) => write!(f, "gpio: {e}"),
            Self::Unsupported(what) => write!(f, "{what} is only available on Linux"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The bus character device could not be opened.
    OpenFailed { path: String, reason: String },
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed { path, reason } => write!(f, "failed to open {path}: {reason}"),
        }
    }
}

impl std::error::Error for BusError {}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Scheduling errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedError {
    /// The kernel refused the real-time policy (usually EPERM without CAP_SYS_NICE).
    PolicyRejected { errno: i32 },
    /// Real-time scheduling is not available on this target.
    Unsupported,
    /// The OS refused to create the thread.
    SpawnFailed(String),
    /// The task thread died before reporting ready.
    SetupAborted(&'static str),
}

impl fmt::Display for SchedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PolicyRejected { errno } => {
                write!(f, "SCHED_FIFO rejected by kernel (errno {errno})")
            }
            Self::Unsupported => write!(f, "real-time scheduling unsupported on this target"),
            Self::SpawnFailed(reason) => write!(f, "thread spawn failed: {reason}"),
            Self::SetupAborted(name) => write!(f, "task '{name}' exited during setup"),
        }
    }
}

impl std::error::Error for SchedError {}

impl From<SchedError> for Error {
    fn from(e: SchedError) -> Self {
        Self::Sched(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors (type lives with the port)
// ---------------------------------------------------------------------------

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// Writing the pin number to the sysfs `export` file failed.
    ExportFailed { gpio: u32, reason: String },
    /// Writing the pin's `direction` file failed.
    DirectionFailed { gpio: u32, reason: String },
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExportFailed { gpio, reason } => write!(f, "export of gpio{gpio} failed: {reason}"),
            Self::DirectionFailed { gpio, reason } => {
                write!(f, "direction of gpio{gpio} not set: {reason}")
            }
        }
    }
}

impl std::error::Error for GpioError {}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
