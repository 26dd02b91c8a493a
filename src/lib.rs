//! Dual-core cooperative task scheduler.
//!
//! The primary core registers lightweight tasks; the second core runs them:
//! - Priority sweeps: every HIGH task, then MEDIUM, then LOW
//! - Single-shot tasks, removed after their first run
//! - Control over a word-wide inter-core FIFO, never blocking on the worker
//!
//! Board support supplies the FIFO ([`WordSender`] / [`WordReceiver`]) and
//! the core launcher ([`Launch`]). [`ipc::mailbox`] provides an in-memory
//! FIFO for hosts and tests.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod control;
pub mod error;
pub mod heap;
pub mod ipc;
pub mod log;
pub mod task;

pub use config::{IdlePolicy, WorkerConfig};
pub use control::Controller;
pub use error::{Result, SchedError};
pub use ipc::{Command, Launch, WordReceiver, WordSender};
pub use task::registry::Registry;
pub use task::scheduler::{Worker, WorkerState, WorkerStats};
pub use task::{create_task, Priority, Task, TaskFn, TaskId, TaskRef};
