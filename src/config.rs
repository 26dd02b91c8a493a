//! Scheduler configuration.
//!
//! Compile-time defaults plus the runtime `WorkerConfig` handed to the
//! worker when it is launched.

use crate::log::Level;

/// Registry slots allocated when the worker starts.
pub const INITIAL_CAPACITY: usize = 10;

/// Upper bound on registered tasks (the registry counter is 8-bit wide).
pub const MAX_TASKS: usize = u8::MAX as usize;

/// Depth of the hardware inter-core FIFO, in words.
pub const FIFO_DEPTH: usize = 8;

/// What the worker does between two ticks of its loop.
#[derive(Debug, Clone, Copy)]
pub enum IdlePolicy {
    /// Re-poll immediately. Lowest command latency, burns the core.
    Spin,
    /// Issue a spin-loop hint before re-polling.
    SpinHint,
    /// Call a board-supplied hook, e.g. `wfe` or a thread yield.
    Hook(fn()),
}

impl IdlePolicy {
    /// Run the policy once.
    #[inline]
    pub fn idle(&self) {
        match self {
            IdlePolicy::Spin => {}
            IdlePolicy::SpinHint => core::hint::spin_loop(),
            IdlePolicy::Hook(hook) => hook(),
        }
    }
}

/// Worker-side settings, fixed at launch.
#[derive(Debug, Clone, Copy)]
pub struct WorkerConfig {
    pub initial_capacity: usize,
    pub max_tasks: usize,
    pub idle: IdlePolicy,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            initial_capacity: INITIAL_CAPACITY,
            max_tasks: MAX_TASKS,
            idle: IdlePolicy::SpinHint,
        }
    }
}

/// Log level baked in at build time via `DUALCORE_SCHED_LOG`.
pub fn default_log_level() -> Level {
    option_env!("DUALCORE_SCHED_LOG")
        .and_then(Level::parse)
        .unwrap_or(Level::Info)
}
