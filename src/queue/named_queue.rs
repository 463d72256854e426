//! A single named queue: bounded buffer plus blocked receivers

use super::waiter::{WaiterId, WaiterList};
use super::{BrokerError, Message, WaitPolicy};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// Where an accepted message ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Passed straight to a blocked receiver
    HandedOff,
    /// Stored in the buffer
    Buffered,
}

#[derive(Debug)]
pub struct Queue {
    name: String,
    capacity: usize,
    state: Mutex<QueueState>,
}

// Buffer and waiters share one lock: a producer must decide between hand-off
// and buffering without a receiver registering in between.
#[derive(Debug, Default)]
struct QueueState {
    buffer: VecDeque<Message>,
    waiters: WaiterList,
}

impl QueueState {
    /// Put back a message whose receiver disappeared before reading it.
    ///
    /// Returning it to a full buffer leaves one message above capacity, and
    /// `put` rejects until the buffer drains below it.
    fn redeliver(&mut self, message: Message) {
        if let Err(message) = self.waiters.hand_off(message) {
            self.buffer.push_front(message);
        }
    }
}

impl Queue {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
            state: Mutex::new(QueueState::default()),
        }
    }

    /// Accept a payload without blocking.
    ///
    /// The oldest live waiter gets the message directly; otherwise it is
    /// appended to the buffer, or rejected with [`BrokerError::QueueFull`]
    /// when the buffer is at capacity.
    pub fn put(&self, payload: impl Into<String>) -> Result<Delivery, BrokerError> {
        let message = Message::new(payload);
        let mut state = self.state.lock();

        match state.waiters.hand_off(message) {
            Ok(waiter) => {
                trace!("Handed message on {} to waiter {}", self.name, waiter);
                Ok(Delivery::HandedOff)
            }
            Err(message) => {
                if state.buffer.len() >= self.capacity {
                    debug!("Queue {} is full ({} messages)", self.name, self.capacity);
                    return Err(BrokerError::QueueFull);
                }
                state.buffer.push_back(message);
                Ok(Delivery::Buffered)
            }
        }
    }

    /// Pop the oldest buffered message, if any
    pub fn try_pop(&self) -> Option<Message> {
        self.state.lock().buffer.pop_front()
    }

    /// Take the oldest buffered message or wait for a producer.
    ///
    /// With [`WaitPolicy::NoWait`] an empty queue fails immediately. Otherwise
    /// the caller is registered behind any earlier waiters and resumes on
    /// delivery, or fails with [`BrokerError::MessageNotFound`] once the limit
    /// elapses. Dropping the returned future deregisters the waiter.
    pub async fn get(&self, wait: WaitPolicy) -> Result<Message, BrokerError> {
        let (id, rx) = {
            let mut state = self.state.lock();
            if let Some(message) = state.buffer.pop_front() {
                return Ok(message);
            }
            if !wait.may_block() {
                return Err(BrokerError::MessageNotFound);
            }
            state.waiters.register()
        };

        trace!("Waiter {} registered on {} ({:?})", id, self.name, wait);
        PendingReceive {
            queue: self,
            id,
            rx,
            settled: false,
        }
        .wait(wait.limit())
        .await
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffered messages
    pub fn len(&self) -> usize {
        self.state.lock().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().buffer.is_empty()
    }

    /// Number of receivers currently blocked on this queue
    pub fn waiting_receivers(&self) -> usize {
        self.state.lock().waiters.len()
    }
}

/// A registered waiter that has not been settled yet.
///
/// Settling happens either by reading the delivered message or by winning the
/// removal race under the queue lock. If the receive is abandoned (the future
/// is dropped) the guard deregisters the waiter, and a message that was
/// already delivered into the slot is passed on instead of being lost.
struct PendingReceive<'a> {
    queue: &'a Queue,
    id: WaiterId,
    rx: oneshot::Receiver<Message>,
    settled: bool,
}

impl PendingReceive<'_> {
    async fn wait(mut self, limit: Option<Duration>) -> Result<Message, BrokerError> {
        let received = match limit {
            Some(limit) => tokio::time::timeout(limit, &mut self.rx).await.ok(),
            None => Some((&mut self.rx).await),
        };

        match received {
            Some(Ok(message)) => {
                self.settled = true;
                Ok(message)
            }
            _ => self.give_up(),
        }
    }

    fn give_up(&mut self) -> Result<Message, BrokerError> {
        self.settled = true;
        if self.queue.state.lock().waiters.remove(self.id) {
            trace!("Waiter {} on {} timed out", self.id, self.queue.name);
            return Err(BrokerError::MessageNotFound);
        }

        // A producer claimed this waiter and sent while holding the lock we
        // just released, so the message is already in the slot.
        trace!(
            "Waiter {} on {} was claimed as it timed out",
            self.id,
            self.queue.name
        );
        self.rx.try_recv().map_err(|_| BrokerError::MessageNotFound)
    }
}

impl Drop for PendingReceive<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }

        let mut state = self.queue.state.lock();
        if state.waiters.remove(self.id) {
            debug!(
                "Released waiter {} on {} after cancelled receive",
                self.id, self.queue.name
            );
            return;
        }

        if let Ok(message) = self.rx.try_recv() {
            debug!(
                "Receiver on {} went away after delivery, passing the message on",
                self.queue.name
            );
            state.redeliver(message);
        }
    }
}
