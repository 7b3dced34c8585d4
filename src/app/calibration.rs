//! Keg fill level from a raw load-cell reading.

use crate::sensors::{SENTINEL, SensorReading};

/// Raw weights of the empty and the full keg, captured before the tasks start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConstants {
    pub empty_weight: f64,
    pub full_weight: f64,
}

impl CalibrationConstants {
    pub fn new(empty_weight: f64, full_weight: f64) -> Self {
        Self {
            empty_weight,
            full_weight,
        }
    }

    /// Fill percentage of a typed reading.  `Invalid` stays `Invalid`.
    pub fn percentage(&self, weight: SensorReading) -> SensorReading {
        weight.map(|raw| percentage(raw, self.empty_weight, self.full_weight))
    }
}

/// `(raw - empty) / full * 100`, with the `-1` sentinel passed through.
///
/// Neither clamped to 0..=100 nor guarded against `full == 0`: a zero span
/// yields `inf`/`NaN` and is rendered as such.
pub fn percentage(raw_weight: f64, empty: f64, full: f64) -> f64 {
    if raw_weight == SENTINEL {
        return SENTINEL;
    }
    (raw_weight - empty) / full * 100.0
}
