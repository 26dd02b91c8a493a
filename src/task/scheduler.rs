//! Priority sweep scheduler for the worker core.
//!
//! Each tick handles at most one pending command from the primary core,
//! then sweeps the registry three times: HIGH tasks, MEDIUM tasks, LOW
//! tasks, each pass in registry order. Tasks run to completion; a task
//! that never returns stalls the core. Single-shot tasks are dropped from
//! the registry right after they run.

use super::registry::Registry;
use super::{Priority, TaskRef};
use crate::config::WorkerConfig;
use crate::error::{Result, SchedError};
use crate::ipc::{self, Command, WordReceiver};
use crate::{log_debug, log_error, log_info, log_warn};

/// Worker lifecycle. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Stopped,
}

/// Counters kept by the worker for diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerStats {
    /// Completed sweeps.
    pub sweeps: u64,
    /// Task entry calls across all sweeps.
    pub executions: u64,
    /// Commands that failed (unknown task, full registry, ...).
    pub rejected_commands: u32,
    /// Error from the most recent failed command.
    pub last_error: Option<SchedError>,
}

/// The scheduler loop state, owned by the worker core.
pub struct Worker<R: WordReceiver> {
    rx: R,
    registry: Registry,
    state: WorkerState,
    config: WorkerConfig,
    stats: WorkerStats,
}

impl<R: WordReceiver> Worker<R> {
    /// Allocate the registry and enter `Running`.
    pub fn new(rx: R, config: WorkerConfig) -> Result<Self> {
        let registry = Registry::with_capacity(config.initial_capacity, config.max_tasks)?;
        Ok(Self::with_registry(rx, registry, config))
    }

    fn with_registry(rx: R, registry: Registry, config: WorkerConfig) -> Self {
        Worker {
            rx,
            registry,
            state: WorkerState::Running,
            config,
            stats: WorkerStats::default(),
        }
    }

    /// Worker core entry point: build the worker and run it until stopped.
    pub fn entry(mut rx: R, config: WorkerConfig) {
        let registry = match Registry::with_capacity(config.initial_capacity, config.max_tasks) {
            Ok(registry) => registry,
            Err(e) => {
                log_error!("[SCHED] Failed to allocate task registry: {}", e);
                // Queued commands still hold task handles.
                ipc::discard_pending(&mut rx);
                return;
            }
        };
        Self::with_registry(rx, registry, config).run()
    }

    /// Tick until a stop command arrives.
    pub fn run(mut self) {
        log_info!(
            "[SCHED] Worker running (capacity {}, max {})",
            self.registry.capacity(),
            self.config.max_tasks
        );

        while self.tick() == WorkerState::Running {
            self.config.idle.idle();
        }

        log_info!(
            "[SCHED] Worker stopped after {} sweeps, {} task runs",
            self.stats.sweeps,
            self.stats.executions
        );
    }

    /// One loop iteration: poll for a command, then sweep if still running.
    pub fn tick(&mut self) -> WorkerState {
        if self.state == WorkerState::Stopped {
            return WorkerState::Stopped;
        }

        if self.rx.has_pending() {
            self.poll_command();
            if self.state == WorkerState::Stopped {
                return WorkerState::Stopped;
            }
        }

        self.sweep();
        self.state
    }

    fn poll_command(&mut self) {
        let tag = self.rx.receive_blocking();
        let Some(command) = Command::from_word(tag) else {
            log_warn!("[SCHED] Ignoring unknown command tag {}", tag);
            return;
        };

        let result = match command {
            Command::AddTask => {
                let task = self.receive_task();
                self.add(task)
            }
            Command::RemoveTask => {
                let task = self.receive_task();
                self.remove(&task)
            }
            Command::StopThread => {
                self.teardown();
                Ok(())
            }
            Command::TaskDone | Command::StartThread => {
                log_debug!("[SCHED] Reserved command {} ignored", command);
                Ok(())
            }
        };

        if let Err(e) = result {
            self.stats.rejected_commands = self.stats.rejected_commands.saturating_add(1);
            self.stats.last_error = Some(e);
        }
    }

    fn receive_task(&mut self) -> TaskRef {
        let word = self.rx.receive_blocking();
        // SAFETY: the payload word after ADD/REMOVE is always produced by
        // `TaskRef::into_word` on the primary core, and this is its only
        // consumer.
        unsafe { TaskRef::from_word(word) }
    }

    fn add(&mut self, task: TaskRef) -> Result<()> {
        let (id, name, priority) = (task.id, task.name, task.priority);
        match self.registry.insert(task) {
            Ok(()) => {
                log_debug!("[SCHED] Added {} '{}' ({})", id, name, priority);
                Ok(())
            }
            Err(e) => {
                log_error!("[SCHED] Failed to add {} '{}': {}", id, name, e);
                Err(e)
            }
        }
    }

    fn remove(&mut self, task: &TaskRef) -> Result<()> {
        match self.registry.remove(task.id) {
            Ok(_) => {
                log_debug!("[SCHED] Removed {} '{}'", task.id, task.name);
                Ok(())
            }
            Err(e) => {
                log_error!("[SCHED] Failed to remove {} '{}': {}", task.id, task.name, e);
                Err(e)
            }
        }
    }

    fn teardown(&mut self) {
        log_debug!("[SCHED] Stop requested, releasing {} tasks", self.registry.len());
        self.registry.teardown();
        self.state = WorkerState::Stopped;
    }

    /// Run every registered task once, HIGH first, then MEDIUM, then LOW.
    fn sweep(&mut self) {
        for level in Priority::ALL {
            let mut i = 0;
            while let Some(task) = self.registry.get(i) {
                if task.priority != level {
                    i += 1;
                    continue;
                }

                let single_shot = task.single_shot;
                task.run();
                self.stats.executions += 1;

                if single_shot {
                    // The next task shifts into slot `i`.
                    let done = self.registry.remove_at(i);
                    log_debug!("[SCHED] {} '{}' completed", done.id, done.name);
                } else {
                    i += 1;
                }
            }
        }
        self.stats.sweeps += 1;
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn stats(&self) -> &WorkerStats {
        &self.stats
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl<R: WordReceiver> Drop for Worker<R> {
    fn drop(&mut self) {
        let discarded = ipc::discard_pending(&mut self.rx);
        if discarded > 0 {
            log_warn!("[SCHED] Dropped {} unread commands", discarded);
        }
    }
}
