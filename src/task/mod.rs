//! Tasks run by the worker core.
//!
//! A task is a plain function plus one word of argument. Every sweep of the
//! scheduler calls it once, until it is removed; single-shot tasks are
//! removed right after their first call. Tasks are shared between the two
//! cores through [`TaskRef`], a reference-counted handle, so the storage is
//! freed exactly once, by whichever side drops the last handle.

pub mod registry;
pub mod scheduler;

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Result, SchedError};
use crate::log_error;

/// Task entry point. Called with the task's argument word.
pub type TaskFn = fn(usize);

/// Unique task identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u32);

static NEXT_ID: AtomicU32 = AtomicU32::new(1);

impl TaskId {
    fn new() -> Self {
        TaskId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl core::fmt::Display for TaskId {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Task#{}", self.0)
    }
}

/// Task priority. A sweep runs every HIGH task, then MEDIUM, then LOW.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium,
    Low,
}

impl Priority {
    /// Sweep order.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];
}

impl core::fmt::Display for Priority {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

/// A schedulable task.
#[derive(Debug)]
pub struct Task {
    pub id: TaskId,
    pub name: &'static str,
    pub priority: Priority,
    pub single_shot: bool,
    entry: TaskFn,
    argument: usize,
}

impl Task {
    /// Call the entry point once, to completion.
    #[inline]
    pub fn run(&self) {
        (self.entry)(self.argument)
    }

    pub fn argument(&self) -> usize {
        self.argument
    }
}

/// Shared handle to a [`Task`].
///
/// The caller keeps one handle; every in-flight add/remove message and the
/// worker's registry slot each hold another.
#[derive(Debug, Clone)]
pub struct TaskRef(Arc<Task>);

impl TaskRef {
    /// Number of live handles to this task (caller, messages, registry).
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    /// Leak a new strong handle as one channel word.
    pub(crate) fn into_word(&self) -> usize {
        Arc::into_raw(Arc::clone(&self.0)) as usize
    }

    /// Reclaim a handle sent with [`TaskRef::into_word`].
    ///
    /// # Safety
    /// `word` must come from `into_word` and be reclaimed exactly once.
    pub(crate) unsafe fn from_word(word: usize) -> Self {
        TaskRef(unsafe { Arc::from_raw(word as *const Task) })
    }
}

impl core::ops::Deref for TaskRef {
    type Target = Task;

    fn deref(&self) -> &Task {
        &self.0
    }
}

/// Build a task ready to hand to [`crate::Controller::add_task`].
///
/// `name` must be non-empty; it is only used in diagnostics.
pub fn create_task(
    entry: TaskFn,
    argument: usize,
    name: &'static str,
    priority: Priority,
    single_shot: bool,
) -> Result<TaskRef> {
    if name.is_empty() {
        log_error!("[SCHED] task name is empty");
        return Err(SchedError::InvalidArgument);
    }

    Ok(TaskRef(Arc::new(Task {
        id: TaskId::new(),
        name,
        priority,
        single_shot,
        entry,
        argument,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: usize) {}

    #[test]
    fn create_task_fills_fields() {
        let task = create_task(noop, 7, "blink", Priority::Medium, true).unwrap();
        assert_eq!(task.name, "blink");
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.single_shot);
        assert_eq!(task.argument(), 7);
    }

    #[test]
    fn create_task_rejects_empty_name() {
        let err = create_task(noop, 0, "", Priority::High, false).unwrap_err();
        assert_eq!(err, SchedError::InvalidArgument);
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let a = create_task(noop, 0, "a", Priority::Low, false).unwrap();
        let b = create_task(noop, 0, "b", Priority::Low, false).unwrap();
        assert_ne!(a.id, b.id);
        assert!(b.id > a.id);
    }

    #[test]
    fn run_passes_argument() {
        use core::sync::atomic::AtomicUsize;
        static SEEN: AtomicUsize = AtomicUsize::new(0);
        fn store(arg: usize) {
            SEEN.store(arg, Ordering::Relaxed);
        }

        let task = create_task(store, 0xBEEF, "store", Priority::High, false).unwrap();
        task.run();
        assert_eq!(SEEN.load(Ordering::Relaxed), 0xBEEF);
    }

    #[test]
    fn word_roundtrip_keeps_task_alive() {
        let task = create_task(noop, 0, "wire", Priority::Low, false).unwrap();
        let word = task.into_word();
        assert_eq!(task.ref_count(), 2);

        let received = unsafe { TaskRef::from_word(word) };
        assert_eq!(received.id, task.id);
        drop(received);
        assert_eq!(task.ref_count(), 1);
    }

    #[test]
    fn priority_sweep_order() {
        assert_eq!(Priority::ALL, [Priority::High, Priority::Medium, Priority::Low]);
        assert!(Priority::High < Priority::Low);
    }
}
