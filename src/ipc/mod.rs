//! Inter-core control protocol.
//!
//! The primary core talks to the worker over a word-wide FIFO. Each command
//! is a tag word, followed by one task-handle word for `AddTask` and
//! `RemoveTask`. The hardware primitives themselves (FIFO and core launch)
//! are provided by the board and reached through the traits below.

pub mod mailbox;

use crate::task::TaskRef;

/// Command tags sent to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Command {
    AddTask = 0,
    RemoveTask,
    /// Reserved.
    TaskDone,
    /// Reserved.
    StartThread,
    StopThread,
}

impl Command {
    pub fn as_word(self) -> usize {
        self as usize
    }

    pub fn from_word(word: usize) -> Option<Command> {
        match word {
            0 => Some(Command::AddTask),
            1 => Some(Command::RemoveTask),
            2 => Some(Command::TaskDone),
            3 => Some(Command::StartThread),
            4 => Some(Command::StopThread),
            _ => None,
        }
    }

    /// Whether a task-handle word follows the tag.
    pub fn has_payload(self) -> bool {
        matches!(self, Command::AddTask | Command::RemoveTask)
    }
}

impl core::fmt::Display for Command {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Command::AddTask => write!(f, "ADD_TASK"),
            Command::RemoveTask => write!(f, "REMOVE_TASK"),
            Command::TaskDone => write!(f, "TASK_DONE"),
            Command::StartThread => write!(f, "START_THREAD"),
            Command::StopThread => write!(f, "STOP_THREAD"),
        }
    }
}

// ─── Board primitives ───────────────────────────────────────────

/// Sending end of the inter-core FIFO.
pub trait WordSender {
    /// Push one word, waiting while the FIFO is full.
    fn send_blocking(&mut self, word: usize);
}

/// Receiving end of the inter-core FIFO.
pub trait WordReceiver {
    /// Pop one word, waiting until one arrives.
    fn receive_blocking(&mut self) -> usize;

    /// Whether a word can be popped without waiting.
    fn has_pending(&mut self) -> bool;
}

/// Starts the second core.
pub trait Launch {
    /// Run `entry` on the worker core. Fire-and-forget.
    fn launch<F>(&mut self, entry: F)
    where
        F: FnOnce() + Send + 'static;
}

/// Consume every pending command, releasing the task handles they carry.
///
/// Returns the number of commands discarded.
pub(crate) fn discard_pending<R: WordReceiver>(rx: &mut R) -> usize {
    let mut discarded = 0;
    while rx.has_pending() {
        let tag = rx.receive_blocking();
        if Command::from_word(tag).is_some_and(Command::has_payload) {
            let word = rx.receive_blocking();
            // SAFETY: the word after an ADD/REMOVE tag comes from
            // `TaskRef::into_word` and nothing else reads this FIFO.
            drop(unsafe { TaskRef::from_word(word) });
        }
        discarded += 1;
    }
    discarded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_roundtrip_through_words() {
        for cmd in [
            Command::AddTask,
            Command::RemoveTask,
            Command::TaskDone,
            Command::StartThread,
            Command::StopThread,
        ] {
            assert_eq!(Command::from_word(cmd.as_word()), Some(cmd));
        }
        assert_eq!(Command::StopThread.as_word(), 4);
        assert_eq!(Command::from_word(5), None);
    }

    #[test]
    fn only_add_and_remove_carry_payload() {
        assert!(Command::AddTask.has_payload());
        assert!(Command::RemoveTask.has_payload());
        assert!(!Command::TaskDone.has_payload());
        assert!(!Command::StartThread.has_payload());
        assert!(!Command::StopThread.has_payload());
    }

    #[test]
    fn discard_pending_releases_carried_handles() {
        use crate::ipc::mailbox;
        use crate::task::{create_task, Priority};

        fn noop(_: usize) {}

        let (mut tx, mut rx) = mailbox::channel(8);
        let task = create_task(noop, 0, "queued", Priority::High, false).unwrap();
        tx.send_blocking(Command::AddTask.as_word());
        tx.send_blocking(task.into_word());
        tx.send_blocking(Command::TaskDone.as_word());
        tx.send_blocking(Command::RemoveTask.as_word());
        tx.send_blocking(task.into_word());
        assert_eq!(task.ref_count(), 3);

        assert_eq!(discard_pending(&mut rx), 3);
        assert!(!rx.has_pending());
        assert_eq!(task.ref_count(), 1);
    }
}
