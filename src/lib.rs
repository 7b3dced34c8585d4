//! Keg monitor library.
//!
//! Samples a load cell and a temperature probe from sysfs and shows the
//! fill level and temperature on an I²C character LCD, driven by three
//! rate-monotonic `SCHED_FIFO` tasks.  Linux-only pieces are guarded by
//! `#[cfg(target_os = "linux")]` inside each module; everything else runs
//! on any host for testing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod board;
pub mod config;
pub mod drivers;
pub mod error;
pub mod scheduler;
pub mod sensors;

pub use error::{Error, Result};
