//! How long a receiver is willing to wait for a message

use clap::ValueEnum;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Only look at the buffer
    NoWait,
    /// Wait up to the given duration for a delivery
    For(Duration),
    /// Wait until a message arrives or the request is cancelled
    Forever,
}

/// Interpretation of a zero timeout supplied by a client or as the default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ZeroTimeout {
    #[default]
    Poll,
    Forever,
}

impl WaitPolicy {
    pub fn from_secs(secs: u64, zero: ZeroTimeout) -> Self {
        match (secs, zero) {
            (0, ZeroTimeout::Poll) => Self::NoWait,
            (0, ZeroTimeout::Forever) => Self::Forever,
            (secs, _) => Self::For(Duration::from_secs(secs)),
        }
    }

    /// Upper bound on the wait, `None` when unbounded
    pub fn limit(&self) -> Option<Duration> {
        match self {
            Self::NoWait => Some(Duration::ZERO),
            Self::For(duration) => Some(*duration),
            Self::Forever => None,
        }
    }

    pub fn may_block(&self) -> bool {
        !matches!(self, Self::NoWait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_secs_polls_by_default() {
        assert_eq!(
            WaitPolicy::from_secs(0, ZeroTimeout::default()),
            WaitPolicy::NoWait
        );
    }

    #[test]
    fn test_zero_secs_can_mean_forever() {
        let policy = WaitPolicy::from_secs(0, ZeroTimeout::Forever);
        assert_eq!(policy, WaitPolicy::Forever);
        assert_eq!(policy.limit(), None);
        assert!(policy.may_block());
    }

    #[test]
    fn test_positive_secs_is_bounded() {
        let policy = WaitPolicy::from_secs(5, ZeroTimeout::Forever);
        assert_eq!(policy, WaitPolicy::For(Duration::from_secs(5)));
        assert_eq!(policy.limit(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_timeout_deserialization() {
        let poll: ZeroTimeout = serde_yaml::from_str("poll").unwrap();
        let forever: ZeroTimeout = serde_yaml::from_str("forever").unwrap();
        assert_eq!(poll, ZeroTimeout::Poll);
        assert_eq!(forever, ZeroTimeout::Forever);
    }
}
