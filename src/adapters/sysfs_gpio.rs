//! Legacy sysfs GPIO preparation.
//!
//! Before a pin's `value` file can be read it has to be exported and given
//! a direction.  Both are single writes under `<gpio-root>`.

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::error::GpioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SysfsGpio {
    root: PathBuf,
}

impl SysfsGpio {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn pin_dir(&self, gpio: u32) -> PathBuf {
        self.root.join(format!("gpio{gpio}"))
    }

    /// Write `gpio` to `<root>/export` unless the pin directory already exists.
    pub fn export(&self, gpio: u32) -> Result<(), GpioError> {
        if self.pin_dir(gpio).exists() {
            return Ok(());
        }
        fs::write(self.root.join("export"), gpio.to_string()).map_err(|e| GpioError::ExportFailed {
            gpio,
            reason: e.to_string(),
        })?;
        info!("GPIO {} exported", gpio);
        Ok(())
    }

    pub fn set_direction(&self, gpio: u32, direction: Direction) -> Result<(), GpioError> {
        fs::write(self.pin_dir(gpio).join("direction"), direction.as_str()).map_err(|e| {
            GpioError::DirectionFailed {
                gpio,
                reason: e.to_string(),
            }
        })
    }

    /// Export and configure in one step.
    pub fn prepare(&self, gpio: u32, direction: Direction) -> Result<(), GpioError> {
        self.export(gpio)?;
        self.set_direction(gpio, direction)?;
        info!("GPIO {} direction {}", gpio, direction.as_str());
        Ok(())
    }
}
