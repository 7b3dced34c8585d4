//! Start-up questions for the operator.
//!
//! Collects the two weight GPIOs, the temperature source id and the two
//! calibration weights, one line each.  Every recorded value is echoed.
//! A line that does not parse is an error; there is no re-prompt.
//!
//! The calibration points are in whatever unit the weight source reports.
//! A value file reports weight; an HX711 reports raw ADC counts, so the
//! prompts ask for the counts read with the keg empty and full.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::app::calibration::CalibrationConstants;
use crate::config::WeightSourceKind;

/// What the operator told us.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorInputs {
    /// `[data, clock]` for an HX711; only the first is read as a value file.
    pub weight_gpios: [u32; 2],
    /// Temperature source id.  Recorded for the log; the probe path comes
    /// from the config.
    pub temperature_id: u32,
    pub calibration: CalibrationConstants,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorError {
    /// Reading stdin or writing the prompt failed.
    Io(String),
    /// Input ended before `field` was answered.
    Eof(&'static str),
    /// The answer to `field` did not parse.
    Invalid { field: &'static str, input: String },
}

impl core::fmt::Display for OperatorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "operator I/O: {msg}"),
            Self::Eof(field) => write!(f, "input ended before {field} was given"),
            Self::Invalid { field, input } => write!(f, "invalid {field}: {input:?}"),
        }
    }
}

impl std::error::Error for OperatorError {}

impl From<std::io::Error> for OperatorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

pub struct OperatorPrompt<R, W> {
    input: R,
    output: W,
    weight_source: WeightSourceKind,
}

impl<R: BufRead, W: Write> OperatorPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            weight_source: WeightSourceKind::ValueFile,
        }
    }

    /// Word the calibration prompts for the source that will be read.
    pub fn weight_source(mut self, kind: WeightSourceKind) -> Self {
        self.weight_source = kind;
        self
    }

    fn calibration_labels(&self) -> (&'static str, &'static str) {
        match self.weight_source {
            WeightSourceKind::ValueFile => ("Empty keg weight", "Full keg weight"),
            WeightSourceKind::Hx711 => (
                "Empty keg weight (HX711 raw counts)",
                "Full keg weight (HX711 raw counts)",
            ),
        }
    }

    pub fn collect(&mut self) -> Result<OperatorInputs, OperatorError> {
        writeln!(self.output, "Enter the two weight sensor GPIOs (data, then clock):")?;
        let first: u32 = self.ask("weight GPIO", "Weight GPIO")?;
        let second: u32 = self.ask("weight GPIO", "Weight GPIO")?;

        let temperature_id: u32 = self.ask("temperature id", "Temperature sensor")?;

        let (empty_label, full_label) = self.calibration_labels();
        let empty_weight: f64 = self.ask("empty keg weight", empty_label)?;
        let full_weight: f64 = self.ask("full keg weight", full_label)?;

        Ok(OperatorInputs {
            weight_gpios: [first, second],
            temperature_id,
            calibration: CalibrationConstants::new(empty_weight, full_weight),
        })
    }

    fn ask<T>(&mut self, field: &'static str, label: &str) -> Result<T, OperatorError>
    where
        T: FromStr + core::fmt::Display,
    {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(OperatorError::Eof(field));
        }
        let answer = line.trim();
        let value = answer.parse::<T>().map_err(|_| OperatorError::Invalid {
            field,
            input: answer.to_owned(),
        })?;
        writeln!(self.output, "{label} recorded: {value}")?;
        Ok(value)
    }
}
