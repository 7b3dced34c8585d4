//! System configuration parameters
//!
//! All tunable parameters for the keg monitor.  Values come from the JSON
//! file read by [`JsonFileConfig`](crate::adapters::config_file::JsonFileConfig);
//! every field falls back to the defaults below when absent.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::board;
use crate::drivers::task_pin::{FIFO_PRIORITY_MAX, FIFO_PRIORITY_MIN};
use crate::scheduler::TaskRole;

/// Where the weight poller gets its raw number from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightSourceKind {
    /// Read `<gpio-root>/gpio<N>/value` for the first weight GPIO.
    ValueFile,
    /// Bit-bang an HX711 on (data, clock) = the two weight GPIOs.
    /// Readings are raw signed ADC counts, not weight; the calibration
    /// points must be given in counts too.
    Hx711,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Sensor sources ---
    /// sysfs GPIO class directory.
    pub gpio_root: PathBuf,
    /// hwmon directory of the 1-Wire temperature probe (holds `temp1_input`).
    pub temperature_dir: PathBuf,
    /// Divisor turning the raw temperature into °C (millidegrees → 1000).
    pub temperature_scale: f64,
    /// Also decides the unit of the operator's calibration points.
    pub weight_source: WeightSourceKind,

    // --- Display bus ---
    /// I²C character device.
    pub i2c_bus: PathBuf,
    /// 7-bit address of the LCD backpack.
    pub display_address: u8,

    // --- Timing ---
    pub weight_period_ms: u64,
    pub display_period_ms: u64,
    pub temperature_period_ms: u64,

    // --- Scheduling ---
    /// `SCHED_FIFO` priority of the lowest-rate task; the others sit above it.
    pub rt_base_priority: u8,
    /// Refuse to start when the real-time class cannot be established.
    pub require_realtime: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Sensor sources
            gpio_root: PathBuf::from(board::GPIO_ROOT),
            temperature_dir: PathBuf::from(board::TEMPERATURE_DIR),
            temperature_scale: 1000.0,
            weight_source: WeightSourceKind::ValueFile,

            // Display bus
            i2c_bus: PathBuf::from(board::I2C_BUS),
            display_address: board::LCD_I2C_ADDR,

            // Timing
            weight_period_ms: 1_000,      // 1 Hz
            display_period_ms: 3_000,     // every 3 s
            temperature_period_ms: 5_000, // every 5 s

            // Scheduling
            rt_base_priority: 1,
            require_realtime: true,
        }
    }
}

impl SystemConfig {
    pub fn period(&self, role: TaskRole) -> Duration {
        Duration::from_millis(match role {
            TaskRole::Weight => self.weight_period_ms,
            TaskRole::Display => self.display_period_ms,
            TaskRole::Temperature => self.temperature_period_ms,
        })
    }

    /// Reject values the tasks cannot run with.  Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weight_period_ms == 0 || self.display_period_ms == 0 || self.temperature_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("task periods must be non-zero"));
        }
        if !(self.weight_period_ms < self.display_period_ms
            && self.display_period_ms < self.temperature_period_ms)
        {
            return Err(ConfigError::ValidationFailed(
                "periods must satisfy weight < display < temperature",
            ));
        }
        let top = TaskRole::ALL.iter().map(|r| r.rank()).max().unwrap_or(0);
        if self.rt_base_priority < FIFO_PRIORITY_MIN
            || u16::from(self.rt_base_priority) + u16::from(top) > u16::from(FIFO_PRIORITY_MAX)
        {
            return Err(ConfigError::ValidationFailed("rt_base_priority outside SCHED_FIFO range"));
        }
        if self.display_address > 0x7F {
            return Err(ConfigError::ValidationFailed("display_address must be 7-bit"));
        }
        if !self.temperature_scale.is_finite() || self.temperature_scale == 0.0 {
            return Err(ConfigError::ValidationFailed("temperature_scale must be finite and non-zero"));
        }
        Ok(())
    }
}
