//! Application core: the shared store, the fill-level arithmetic, the
//! status line, and the task bodies the supervisor schedules.
//!
//! Hardware is reached only through the **port traits** in [`ports`], so
//! everything here runs on the host against mocks.

pub mod calibration;
pub mod ports;
pub mod status;
pub mod store;
pub mod supervisor;
