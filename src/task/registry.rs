//! Task registry owned by the worker core.
//!
//! An ordered, growable list of task handles. Capacity starts at the
//! configured size and doubles when full, up to `max_tasks`; it only
//! shrinks on teardown. Removal shifts later tasks left, so registry order
//! stays insertion order.

use alloc::vec::Vec;

use super::{TaskId, TaskRef};
use crate::error::{Result, SchedError};

pub struct Registry {
    tasks: Vec<TaskRef>,
    capacity: usize,
    max_tasks: usize,
}

impl Registry {
    /// Allocate room for `initial` tasks.
    pub fn with_capacity(initial: usize, max_tasks: usize) -> Result<Self> {
        if initial == 0 || initial > max_tasks {
            return Err(SchedError::InvalidArgument);
        }
        let mut tasks = Vec::new();
        tasks.try_reserve_exact(initial)?;
        Ok(Registry {
            tasks,
            capacity: initial,
            max_tasks,
        })
    }

    /// Append a task, doubling capacity if the registry is full.
    ///
    /// On failure the registry is left untouched.
    pub fn insert(&mut self, task: TaskRef) -> Result<()> {
        if self.tasks.len() == self.capacity {
            self.grow()?;
        }
        self.tasks.push(task);
        Ok(())
    }

    fn grow(&mut self) -> Result<()> {
        if self.capacity >= self.max_tasks {
            return Err(SchedError::ResourceExhausted);
        }
        let new_capacity = (self.capacity * 2).clamp(1, self.max_tasks);
        self.tasks.try_reserve_exact(new_capacity - self.tasks.len())?;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Remove the first task with `id`, returning its handle.
    pub fn remove(&mut self, id: TaskId) -> Result<TaskRef> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or(SchedError::NotFound)?;
        Ok(self.tasks.remove(index))
    }

    pub(crate) fn get(&self, index: usize) -> Option<&TaskRef> {
        self.tasks.get(index)
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> TaskRef {
        self.tasks.remove(index)
    }

    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every handle and release the storage.
    pub fn teardown(&mut self) {
        self.tasks = Vec::new();
        self.capacity = 0;
    }
}
