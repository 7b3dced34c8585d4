//! Real-time priority for the calling thread.
//!
//! Wraps `pthread_setschedparam(SCHED_FIFO)` so that a periodic task can
//! move itself into the fixed-priority real-time class right after it
//! starts.  `std::thread::Builder` has no scheduling-policy knob, so the
//! policy is applied from inside the new thread rather than through
//! creation attributes.
//!
//! # Linux Threading Model
//!
//! Under `SCHED_FIFO` the kernel always runs the highest-priority runnable
//! thread; equal priorities run first-come first-served until they block.
//! Setting the policy needs `CAP_SYS_NICE` (or root, or an `RLIMIT_RTPRIO`
//! grant).  On non-Linux targets the call reports
//! [`SchedError::Unsupported`].

use crate::error::SchedError;

/// Lowest `SCHED_FIFO` priority on Linux.
pub const FIFO_PRIORITY_MIN: u8 = 1;
/// Highest `SCHED_FIFO` priority on Linux.
pub const FIFO_PRIORITY_MAX: u8 = 99;

/// Move the calling thread into `SCHED_FIFO` at `priority`.
#[cfg(target_os = "linux")]
pub fn set_current_thread_fifo(priority: u8) -> Result<(), SchedError> {
    // SAFETY: sched_param is a plain C struct; all-zero is a valid value.
    let mut param: libc::sched_param = unsafe { core::mem::zeroed() };
    param.sched_priority = i32::from(priority);

    // SAFETY: pthread_self() is always a valid handle for the calling thread
    // and `param` outlives the call.
    let rc = unsafe { libc::pthread_setschedparam(libc::pthread_self(), libc::SCHED_FIFO, &param) };
    if rc != 0 {
        return Err(SchedError::PolicyRejected { errno: rc });
    }

    let name = std::thread::current().name().unwrap_or("<unnamed>").to_owned();
    log::info!("Thread '{}' now SCHED_FIFO pri={}", name, priority);
    Ok(())
}

/// Non-Linux fallback: no real-time class available.
#[cfg(not(target_os = "linux"))]
pub fn set_current_thread_fifo(_priority: u8) -> Result<(), SchedError> {
    Err(SchedError::Unsupported)
}

/// Current scheduling policy and priority of the calling thread.
#[cfg(all(test, target_os = "linux"))]
fn current_thread_policy() -> Option<(i32, i32)> {
    let mut policy: i32 = 0;
    // SAFETY: see set_current_thread_fifo.
    let mut param: libc::sched_param = unsafe { core::mem::zeroed() };
    // SAFETY: both out-pointers are valid for the duration of the call.
    let rc = unsafe { libc::pthread_getschedparam(libc::pthread_self(), &mut policy, &mut param) };
    (rc == 0).then_some((policy, param.sched_priority))
}
