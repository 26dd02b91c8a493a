//! Primary-core control of the worker.
//!
//! The controller never touches the worker's registry; every request is
//! turned into a command on the inter-core FIFO. Calls only block while
//! the FIFO is full.

use crate::config::WorkerConfig;
use crate::error::{Result, SchedError};
use crate::ipc::{Command, Launch, WordReceiver, WordSender};
use crate::task::scheduler::Worker;
use crate::task::TaskRef;
use crate::{log_debug, log_error, log_info, log_warn};

/// Primary-core handle on the scheduler.
pub struct Controller<S> {
    tx: S,
    config: WorkerConfig,
    stopped: bool,
}

impl<S: WordSender> Controller<S> {
    /// Controller with the default worker configuration.
    pub fn new(tx: S) -> Self {
        Self::with_config(tx, WorkerConfig::default())
    }

    pub fn with_config(tx: S, config: WorkerConfig) -> Self {
        Controller {
            tx,
            config,
            stopped: false,
        }
    }

    /// Launch the worker on the second core, reading commands from `rx`.
    ///
    /// Returns immediately; the worker may not be running yet.
    pub fn start<L, R>(&mut self, launcher: &mut L, rx: R)
    where
        L: Launch,
        R: WordReceiver + Send + 'static,
    {
        let config = self.config;
        launcher.launch(move || Worker::entry(rx, config));
        log_info!("[SCHED] Worker launched");
    }

    /// Ask the worker to release its tasks and exit.
    ///
    /// Does not wait for the worker to finish.
    pub fn stop(&mut self) {
        if self.stopped {
            log_warn!("[SCHED] Stop already requested");
            return;
        }
        self.tx.send_blocking(Command::StopThread.as_word());
        self.stopped = true;
        log_info!("[SCHED] Stop requested");
    }

    /// Queue `task` for insertion into the worker's registry.
    pub fn add_task(&mut self, task: &TaskRef) -> Result<()> {
        self.send(Command::AddTask, task)
    }

    /// Queue removal of the registered task with the same id as `task`.
    ///
    /// An unknown id is reported by the worker, not here.
    pub fn remove_task(&mut self, task: &TaskRef) -> Result<()> {
        self.send(Command::RemoveTask, task)
    }

    fn send(&mut self, command: Command, task: &TaskRef) -> Result<()> {
        if self.stopped {
            log_error!("[SCHED] {} for {} after stop", command, task.id);
            return Err(SchedError::NotRunning);
        }
        // Tag and payload go back-to-back; this is the only producer.
        self.tx.send_blocking(command.as_word());
        self.tx.send_blocking(task.into_word());
        log_debug!("[SCHED] Sent {} for {} '{}'", command, task.id, task.name);
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
