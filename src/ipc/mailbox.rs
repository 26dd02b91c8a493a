//! In-memory word FIFO.
//!
//! Stands in for the hardware inter-core FIFO on hosts and in simulation:
//! a bounded queue of words shared by one sender and one receiver.

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use spin::Mutex;

use super::{WordReceiver, WordSender};

struct Mailbox {
    queue: Mutex<VecDeque<usize>>,
    depth: usize,
}

/// Sending end of a mailbox.
pub struct MailboxSender(Arc<Mailbox>);

/// Receiving end of a mailbox.
pub struct MailboxReceiver(Arc<Mailbox>);

/// Create a FIFO holding at most `depth` words.
pub fn channel(depth: usize) -> (MailboxSender, MailboxReceiver) {
    let mailbox = Arc::new(Mailbox {
        queue: Mutex::new(VecDeque::with_capacity(depth)),
        depth: depth.max(1),
    });
    (
        MailboxSender(Arc::clone(&mailbox)),
        MailboxReceiver(mailbox),
    )
}

impl MailboxSender {
    /// Push without waiting. Returns `false` if the FIFO is full.
    pub fn try_send(&mut self, word: usize) -> bool {
        let mut queue = self.0.queue.lock();
        if queue.len() >= self.0.depth {
            return false;
        }
        queue.push_back(word);
        true
    }
}

impl WordSender for MailboxSender {
    fn send_blocking(&mut self, word: usize) {
        while !self.try_send(word) {
            core::hint::spin_loop();
        }
    }
}

impl MailboxReceiver {
    /// Pop without waiting.
    pub fn try_receive(&mut self) -> Option<usize> {
        self.0.queue.lock().pop_front()
    }

    /// Words currently queued.
    pub fn len(&self) -> usize {
        self.0.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WordReceiver for MailboxReceiver {
    fn receive_blocking(&mut self) -> usize {
        loop {
            if let Some(word) = self.try_receive() {
                return word;
            }
            core::hint::spin_loop();
        }
    }

    fn has_pending(&mut self) -> bool {
        !self.is_empty()
    }
}
