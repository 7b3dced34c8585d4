//! Port traits: the boundary between the task bodies and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Supervisor task bodies
//! ```
//!
//! The pollers and the display refresher only ever see these traits, so the
//! task bodies run unchanged against sysfs files, an HX711, a real I²C LCD,
//! or the recording mocks used by the tests.

use crate::config::SystemConfig;
use crate::sensors::SensorReading;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → task body)
// ───────────────────────────────────────────────────────────────

/// A single sensor source sampled once per poller period.
///
/// Implementations never fail: anything that goes wrong is reported as
/// [`SensorReading::Invalid`] and the next period performs the next attempt.
pub trait SensorPort {
    fn read(&mut self) -> SensorReading;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: task body → character display)
// ───────────────────────────────────────────────────────────────

/// Renders one full frame of text, replacing whatever was shown before.
pub trait DisplayPort {
    fn show(&mut self, line: &str);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads system configuration.
///
/// Implementations return [`ConfigError::NotFound`] when no stored
/// configuration exists so the caller can fall back to defaults, and
/// validate everything they return.
pub trait ConfigPort {
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No config file at the expected location.
    NotFound,
    /// The config file exists but could not be deserialized.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the backing file.
    Io(String),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
