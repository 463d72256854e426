use thiserror::Error;

/// Outcomes of broker operations that did not produce a message.
///
/// None of these are faults: they describe exhausted limits or an empty
/// queue, and the caller decides whether to retry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BrokerError {
    #[error("maximum queues limit reached")]
    QueueLimitReached,
    #[error("queue is full")]
    QueueFull,
    #[error("message not found")]
    MessageNotFound,
}

impl BrokerError {
    /// True for the conditions caused by a configured limit being hit
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, Self::QueueLimitReached | Self::QueueFull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BrokerError::QueueLimitReached.to_string(),
            "maximum queues limit reached"
        );
        assert_eq!(BrokerError::QueueFull.to_string(), "queue is full");
        assert_eq!(BrokerError::MessageNotFound.to_string(), "message not found");
    }

    #[test]
    fn test_resource_exhaustion_kinds() {
        assert!(BrokerError::QueueLimitReached.is_resource_exhausted());
        assert!(BrokerError::QueueFull.is_resource_exhausted());
        assert!(!BrokerError::MessageNotFound.is_resource_exhausted());
    }
}
