//! Sysfs value-file reader.
//!
//! The kernel exposes both sensors as small text files:
//!
//! * a GPIO cell at `<gpio-root>/gpio<N>/value`
//! * the 1-Wire temperature probe's hwmon node at `<temperature-dir>/temp1_input`
//!   (millidegrees Celsius; scaling is the poller's job)
//!
//! A read opens the file, takes one line, and parses it.  Every failure
//! collapses into [`SensorReading::Invalid`]; the next poll period is the
//! retry.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;

use super::SensorReading;
use crate::app::ports::SensorPort;

/// Which file a read targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorSource {
    /// `<gpio-root>/gpio<N>/value`
    Gpio(u32),
    /// `<temperature-dir>/temp1_input`
    BusTemperature,
}

/// Resolves [`SensorSource`]s to paths and reads them.
#[derive(Debug, Clone)]
pub struct SensorReader {
    gpio_root: PathBuf,
    temperature_dir: PathBuf,
}

impl SensorReader {
    pub fn new(gpio_root: impl Into<PathBuf>, temperature_dir: impl Into<PathBuf>) -> Self {
        Self {
            gpio_root: gpio_root.into(),
            temperature_dir: temperature_dir.into(),
        }
    }

    pub fn path(&self, source: SensorSource) -> PathBuf {
        match source {
            SensorSource::Gpio(id) => self.gpio_root.join(format!("gpio{id}")).join("value"),
            SensorSource::BusTemperature => self.temperature_dir.join("temp1_input"),
        }
    }

    /// Read one sample.  Never fails and never retries.
    pub fn read(&self, source: SensorSource) -> SensorReading {
        let path = self.path(source);
        match read_first_line(&path) {
            Ok(Some(line)) => {
                let reading = parse_reading(&line);
                if !reading.is_valid() {
                    debug!("{}: unparseable content {:?}", path.display(), line);
                }
                reading
            }
            Ok(None) => {
                debug!("{}: empty", path.display());
                SensorReading::Invalid
            }
            Err(e) => {
                debug!("{}: {}", path.display(), e);
                SensorReading::Invalid
            }
        }
    }
}

fn read_first_line(path: &Path) -> std::io::Result<Option<String>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Parse the first line of a value file.
///
/// Leading whitespace is skipped and a single terminating newline is
/// accepted; any other trailing character, or no number at all, makes the
/// reading invalid.  Content after the first newline is never looked at.
pub fn parse_reading(content: &str) -> SensorReading {
    let line = content.split_inclusive('\n').next().unwrap_or("");
    let number = line.strip_suffix('\n').unwrap_or(line).trim_start();
    if number.is_empty() {
        return SensorReading::Invalid;
    }
    number
        .parse::<f64>()
        .map_or(SensorReading::Invalid, SensorReading::from_raw)
}

/// A [`SensorPort`] bound to one sysfs source.
pub struct SysfsSensor {
    reader: SensorReader,
    source: SensorSource,
}

impl SysfsSensor {
    pub fn new(reader: SensorReader, source: SensorSource) -> Self {
        Self { reader, source }
    }
}

impl SensorPort for SysfsSensor {
    fn read(&mut self) -> SensorReading {
        self.reader.read(self.source)
    }
}
