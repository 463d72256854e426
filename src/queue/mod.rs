//! Named message queues with blocking receive
//!
//! This module provides the broker core:
//! - Lazily created, bounded FIFO queues addressed by name
//! - Direct hand-off from producers to blocked receivers
//! - Timeout and cancellation handling that never loses a delivered message

pub mod broker;
pub mod error;
pub mod message;
pub mod named_queue;
pub mod wait;
mod waiter;

pub use broker::Broker;
pub use error::BrokerError;
pub use message::Message;
pub use named_queue::{Delivery, Queue};
pub use wait::{WaitPolicy, ZeroTimeout};
pub use waiter::WaiterId;

use async_trait::async_trait;
use std::sync::Arc;

/// Operations the HTTP layer needs from the broker
#[async_trait]
pub trait MessageBroker: Send + Sync {
    async fn put(&self, queue_name: &str, payload: String) -> Result<(), BrokerError>;

    async fn get(&self, queue_name: &str, wait: WaitPolicy) -> Result<Message, BrokerError>;
}

/// Shared broker instance
pub type SharedBroker = Arc<Broker>;

/// Create a new shared broker
pub fn create_shared_broker(max_queues: usize, max_messages: usize) -> SharedBroker {
    Arc::new(Broker::new(max_queues, max_messages))
}
