//! The one line shown on the LCD.

use crate::sensors::SensorReading;

/// `Temp:<t>C Wght:<p>%`, both rounded to whole numbers.
///
/// Invalid readings render as the `-1` sentinel.  Non-finite values are
/// printed as Rust formats them (`inf`, `NaN`).
pub fn format_status(temperature: SensorReading, percentage: SensorReading) -> String {
    format!("Temp:{:.0}C Wght:{:.0}%", temperature.to_raw(), percentage.to_raw())
}
