//! Message value carried through queues

use std::time::SystemTime;

/// A payload together with the instant it entered the broker.
///
/// Messages are never mutated after construction; they move from the producer
/// into either a queue buffer or a waiting receiver and are handed out once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    payload: String,
    created_at: SystemTime,
}

impl Message {
    /// Create a message stamped with the current time
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            created_at: SystemTime::now(),
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn into_payload(self) -> String {
        self.payload
    }
}
