pub mod cli;
pub mod config;
pub mod queue;
pub mod web_server;

// Public API
pub use config::Config;
pub use queue::{Broker, BrokerError, Message, MessageBroker, Queue, SharedBroker, WaitPolicy};
pub use web_server::{ApiError, WebServer};
