//! Latest-value store shared by the three periodic tasks.
//!
//! Two cells, each behind its own lock.  The weight poller is the only
//! writer of `weight`, the temperature poller the only writer of
//! `temperature`, and the display refresher reads both.  Every accessor
//! holds its lock for exactly one copy in or out.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::sensors::SensorReading;

#[derive(Debug, Default)]
pub struct MetricStore {
    temperature: Mutex<SensorReading>,
    weight: Mutex<SensorReading>,
}

impl MetricStore {
    /// Both cells start out [`SensorReading::Invalid`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_temperature(&self, reading: SensorReading) {
        *lock(&self.temperature) = reading;
    }

    pub fn temperature(&self) -> SensorReading {
        *lock(&self.temperature)
    }

    pub fn set_weight(&self, reading: SensorReading) {
        *lock(&self.weight) = reading;
    }

    pub fn weight(&self) -> SensorReading {
        *lock(&self.weight)
    }
}

// A panicking holder cannot leave a `Copy` cell half-written, so the
// poison flag carries no information here.
fn lock(cell: &Mutex<SensorReading>) -> MutexGuard<'_, SensorReading> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}
