//! Broker owning every named queue

use super::{BrokerError, Delivery, Message, MessageBroker, Queue, WaitPolicy};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registry of named queues with fixed limits.
///
/// Queues are created on first use by either `put` or `get` and live as long
/// as the broker. The registry lock only guards the name map; traffic on an
/// existing queue takes that queue's own lock.
#[derive(Debug)]
pub struct Broker {
    queues: RwLock<HashMap<String, Arc<Queue>>>,
    max_queues: usize,
    max_messages: usize,
}

impl Broker {
    pub fn new(max_queues: usize, max_messages: usize) -> Self {
        Self {
            queues: RwLock::new(HashMap::new()),
            max_queues,
            max_messages,
        }
    }

    /// Look up a queue, creating it if the name is new and the limit allows
    pub fn resolve(&self, queue_name: &str) -> Result<Arc<Queue>, BrokerError> {
        if let Some(queue) = self.queues.read().get(queue_name) {
            return Ok(Arc::clone(queue));
        }

        let mut queues = self.queues.write();
        // Another request may have created it between the two locks
        if let Some(queue) = queues.get(queue_name) {
            return Ok(Arc::clone(queue));
        }

        if queues.len() >= self.max_queues {
            warn!(
                "Refusing to create queue {}: limit of {} queues reached",
                queue_name, self.max_queues
            );
            return Err(BrokerError::QueueLimitReached);
        }

        info!("Creating queue: {}", queue_name);
        let queue = Arc::new(Queue::new(queue_name, self.max_messages));
        queues.insert(queue_name.to_string(), Arc::clone(&queue));
        Ok(queue)
    }

    /// Enqueue a payload, handing it to a blocked receiver when there is one
    pub fn put(&self, queue_name: &str, payload: String) -> Result<Delivery, BrokerError> {
        let delivery = self.resolve(queue_name)?.put(payload)?;
        debug!("Put to {}: {:?}", queue_name, delivery);
        Ok(delivery)
    }

    /// Dequeue from a queue, waiting according to `wait` when it is empty
    pub async fn get(&self, queue_name: &str, wait: WaitPolicy) -> Result<Message, BrokerError> {
        let queue = self.resolve(queue_name)?;
        queue.get(wait).await
    }

    /// Existing queue by name, without creating it
    pub fn queue(&self, queue_name: &str) -> Option<Arc<Queue>> {
        self.queues.read().get(queue_name).cloned()
    }

    pub fn queue_count(&self) -> usize {
        self.queues.read().len()
    }

    pub fn max_queues(&self) -> usize {
        self.max_queues
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }
}

#[async_trait]
impl MessageBroker for Broker {
    async fn put(&self, queue_name: &str, payload: String) -> Result<(), BrokerError> {
        Broker::put(self, queue_name, payload).map(|_| ())
    }

    async fn get(&self, queue_name: &str, wait: WaitPolicy) -> Result<Message, BrokerError> {
        Broker::get(self, queue_name, wait).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio_test::assert_ok;

    #[test]
    fn test_broker_creation() {
        let broker = Broker::new(100, 1000);

        assert_eq!(broker.queue_count(), 0);
        assert_eq!(broker.max_queues(), 100);
        assert_eq!(broker.max_messages(), 1000);
    }

    #[test]
    fn test_resolve_returns_same_instance() {
        let broker = Broker::new(10, 10);

        let first = broker.resolve("emails").unwrap();
        let second = broker.resolve("emails").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(broker.queue_count(), 1);
    }

    #[test]
    fn test_queue_limit_applies_to_new_names_only() {
        let broker = Broker::new(2, 10);
        assert_ok!(broker.put("a", "1".to_string()));
        assert_ok!(broker.put("b", "2".to_string()));

        assert_eq!(
            broker.put("c", "3".to_string()),
            Err(BrokerError::QueueLimitReached)
        );
        assert_ok!(broker.put("a", "4".to_string()));
        assert_eq!(broker.queue_count(), 2);
        assert_eq!(broker.queue("a").unwrap().len(), 2);
        assert!(broker.queue("c").is_none());
    }

    #[tokio::test]
    async fn test_get_creates_empty_queue() {
        let broker = Broker::new(10, 10);

        let result = broker.get("never-put", WaitPolicy::NoWait).await;

        assert_eq!(result, Err(BrokerError::MessageNotFound));
        assert_eq!(broker.queue("never-put").unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_get_respects_queue_limit() {
        let broker = Broker::new(1, 10);
        broker.resolve("only").unwrap();

        assert_eq!(
            broker.get("other", WaitPolicy::NoWait).await,
            Err(BrokerError::QueueLimitReached)
        );
    }

    #[tokio::test]
    async fn test_put_then_get_through_trait() {
        let broker: Arc<dyn MessageBroker> = Arc::new(Broker::new(10, 10));

        MessageBroker::put(broker.as_ref(), "jobs", "payload".to_string())
            .await
            .unwrap();
        let message = MessageBroker::get(
            broker.as_ref(),
            "jobs",
            WaitPolicy::For(Duration::from_secs(1)),
        )
        .await
        .unwrap();

        assert_eq!(message.payload(), "payload");
    }
}
