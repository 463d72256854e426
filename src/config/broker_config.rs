use serde::Deserialize;

// Broker limits, fixed for the life of the process
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BrokerConfig {
    #[serde(default = "default_max_queues")]
    pub max_queues: usize,
    #[serde(default = "default_max_messages")]
    pub max_messages: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            max_queues: default_max_queues(),
            max_messages: default_max_messages(),
        }
    }
}

fn default_max_queues() -> usize {
    100
}

fn default_max_messages() -> usize {
    1000
}
