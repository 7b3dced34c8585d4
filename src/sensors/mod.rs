//! Sensor subsystem: the reading type shared by every source plus the
//! individual drivers.
//!
//! * [`reader`]: sysfs value files (`gpio<N>/value`, `temp1_input`).
//! * [`hx711`]: bit-banged 24-bit load-cell ADC.

pub mod hx711;
pub mod reader;

/// Raw value that stands for "not yet read / read failed" at the
/// file and display boundaries.
pub const SENTINEL: f64 = -1.0;

/// A single sample from a sensor.
///
/// Validity is explicit everywhere inside the crate.  The sentinel only
/// appears when converting from a raw file value ([`from_raw`](Self::from_raw))
/// and when rendering ([`to_raw`](Self::to_raw)).  A raw value exactly equal
/// to the sentinel is treated as invalid; physical keg weights and
/// temperatures never legitimately land on it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SensorReading {
    Valid(f64),
    #[default]
    Invalid,
}

impl SensorReading {
    /// Interpret a raw number, folding the sentinel into `Invalid`.
    pub fn from_raw(raw: f64) -> Self {
        if raw == SENTINEL {
            Self::Invalid
        } else {
            Self::Valid(raw)
        }
    }

    /// The raw number, with `Invalid` rendered as the sentinel.
    pub fn to_raw(self) -> f64 {
        match self {
            Self::Valid(v) => v,
            Self::Invalid => SENTINEL,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Invalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// Apply `f` to a valid value; `Invalid` passes through untouched.
    #[must_use]
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Valid(v) => Self::Valid(f(v)),
            Self::Invalid => Self::Invalid,
        }
    }
}
