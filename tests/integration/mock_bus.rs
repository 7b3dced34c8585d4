//! Recording I²C bus and delay for integration tests.
//!
//! Both halves push into one shared timeline so tests can assert on the
//! exact interleaving of bus writes and waits, and the handles are `Send`
//! so a driver can be built on a task thread while the test inspects it.

use core::convert::Infallible;
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

// ── Timeline ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    Write { address: u8, byte: u8 },
    Delay { ns: u64 },
}

#[derive(Debug, Clone, Default)]
pub struct Timeline(Arc<Mutex<Vec<BusEvent>>>);

#[allow(dead_code)]
impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bus(&self) -> RecordingI2c {
        RecordingI2c(self.clone())
    }

    pub fn delay(&self) -> RecordingDelay {
        RecordingDelay(self.clone())
    }

    pub fn events(&self) -> Vec<BusEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    /// Written bytes only, in order.
    pub fn bytes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                BusEvent::Write { byte, .. } => Some(byte),
                BusEvent::Delay { .. } => None,
            })
            .collect()
    }

    fn push(&self, event: BusEvent) {
        self.0.lock().unwrap().push(event);
    }
}

// ── Bus ───────────────────────────────────────────────────────

pub struct RecordingI2c(Timeline);

impl ErrorType for RecordingI2c {
    type Error = Infallible;
}

impl I2c for RecordingI2c {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Infallible> {
        for op in operations {
            if let Operation::Write(data) = op {
                for &byte in data.iter() {
                    self.0.push(BusEvent::Write { address, byte });
                }
            }
        }
        Ok(())
    }
}

/// A bus with nothing answering at any address.
pub struct NackI2c {
    pub attempts: u32,
}

impl ErrorType for NackI2c {
    type Error = ErrorKind;
}

impl I2c for NackI2c {
    fn transaction(&mut self, _address: u8, _operations: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        self.attempts += 1;
        Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
    }
}

// ── Delay ─────────────────────────────────────────────────────

pub struct RecordingDelay(Timeline);

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.push(BusEvent::Delay { ns: u64::from(ns) });
    }
}

/// Delay that returns immediately and records nothing.
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
