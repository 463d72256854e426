//! Registry of receivers blocked on an empty queue
//!
//! Each waiter owns a one-shot slot. A waiter is claimed by whoever removes it
//! from the list while holding the queue lock: a producer that pops it and
//! sends, or the receiver itself when it gives up. Both run under the same
//! lock, so exactly one of them wins.

use super::Message;
use std::collections::VecDeque;
use tokio::sync::oneshot;
use tracing::trace;

pub type WaiterId = u64;

#[derive(Debug, Default)]
pub(crate) struct WaiterList {
    next_id: WaiterId,
    entries: VecDeque<(WaiterId, oneshot::Sender<Message>)>,
}

impl WaiterList {
    /// Append a new waiter at the tail and return its id and receiving end
    pub(crate) fn register(&mut self) -> (WaiterId, oneshot::Receiver<Message>) {
        let (tx, rx) = oneshot::channel();
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push_back((id, tx));
        (id, rx)
    }

    /// Remove a waiter that is still registered.
    ///
    /// Returns `false` when the waiter was already claimed by a delivery.
    pub(crate) fn remove(&mut self, id: WaiterId) -> bool {
        match self.entries.iter().position(|(entry_id, _)| *entry_id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Deliver to the oldest waiter whose receiver is still alive.
    ///
    /// Waiters whose receiver has gone away are discarded on the way. When no
    /// waiter accepts, the message comes back to the caller untouched.
    pub(crate) fn hand_off(&mut self, mut message: Message) -> Result<WaiterId, Message> {
        while let Some((id, tx)) = self.entries.pop_front() {
            match tx.send(message) {
                Ok(()) => return Ok(id),
                Err(returned) => {
                    trace!("Waiter {} is gone, trying the next one", id);
                    message = returned;
                }
            }
        }
        Err(message)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
