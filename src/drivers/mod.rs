//! Peripheral drivers and thread scheduling helpers.

pub mod lcd;
pub mod task_pin;
