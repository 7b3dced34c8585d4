//! Periodic real-time task runner.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Rate-monotonic priorities                    │
//! │                                                              │
//! │   weight poll     1 s   ── base + 2  (highest)               │
//! │   display refresh 3 s   ── base + 1                          │
//! │   temperature     5 s   ── base + 0  (lowest)                │
//! │                                                              │
//! │  spawn(spec, setup)                                          │
//! │    ├─ SCHED_FIFO at spec.priority   (drivers::task_pin)      │
//! │    ├─ setup() → body                (open bus / pins)        │
//! │    ├─ report ready ──────────────▶ spawner                   │
//! │    └─ loop { sleep(period); body() }                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Priorities come from the task's [`TaskRole`], never from the order in
//! which tasks are configured or spawned.  The configuration layer rejects
//! periods that would contradict that ranking.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};

use crate::config::SystemConfig;
use crate::drivers::task_pin;
use crate::error::{Result, SchedError};

// ═══════════════════════════════════════════════════════════════
//  Task description
// ═══════════════════════════════════════════════════════════════

/// The three periodic activities of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRole {
    Weight,
    Display,
    Temperature,
}

impl TaskRole {
    pub const ALL: [TaskRole; 3] = [Self::Weight, Self::Display, Self::Temperature];

    /// Offset above the configured base priority.  Shorter period ⇒ higher.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Weight => 2,
            Self::Display => 1,
            Self::Temperature => 0,
        }
    }

    /// Thread name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Weight => "weight-poll",
            Self::Display => "display-refresh",
            Self::Temperature => "temperature-poll",
        }
    }
}

/// `{period, priority}` record handed to the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: &'static str,
    pub period: Duration,
    pub priority: u8,
}

impl TaskSpec {
    pub fn for_role(role: TaskRole, config: &SystemConfig) -> Self {
        Self {
            name: role.name(),
            period: config.period(role),
            priority: config.rt_base_priority.saturating_add(role.rank()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Runner
// ═══════════════════════════════════════════════════════════════

/// A running periodic task.  The thread never exits on its own.
#[derive(Debug)]
pub struct PeriodicTask {
    spec: TaskSpec,
    handle: JoinHandle<()>,
}

impl PeriodicTask {
    /// Start a periodic task and wait until it is running.
    ///
    /// On the new thread: apply `SCHED_FIFO` at `spec.priority`, run
    /// `setup` once to build the body, report back, then loop forever.
    /// A failed `setup` (or a refused real-time class when
    /// `require_realtime` is set) is returned here and the thread exits.
    pub fn spawn<S, B>(spec: TaskSpec, require_realtime: bool, setup: S) -> Result<Self>
    where
        S: FnOnce() -> Result<B> + Send + 'static,
        B: FnMut() + 'static,
    {
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<()>>(1);

        info!(
            "Spawning '{}' (pri={}, period={}ms)",
            spec.name,
            spec.priority,
            spec.period.as_millis()
        );

        let handle = thread::Builder::new()
            .name(spec.name.into())
            .spawn(move || {
                if let Err(e) = task_pin::set_current_thread_fifo(spec.priority) {
                    if require_realtime {
                        let _ = ready_tx.send(Err(e.into()));
                        return;
                    }
                    warn!("'{}': {}; running under the default policy", spec.name, e);
                }

                let body = match setup() {
                    Ok(body) => body,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                drop(ready_tx);

                run_forever(spec.period, body)
            })
            .map_err(|e| SchedError::SpawnFailed(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { spec, handle }),
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(SchedError::SetupAborted(spec.name).into())
            }
        }
    }

    pub fn spec(&self) -> TaskSpec {
        self.spec
    }

    /// Block until the task thread ends.  Only a panic in the body ends it.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

/// Sleep one period, run the body, repeat.
fn run_forever(period: Duration, mut body: impl FnMut()) -> ! {
    loop {
        thread::sleep(period);
        body();
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
