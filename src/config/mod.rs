pub mod broker_config;
pub mod server_config;

use crate::cli::Cli;
use crate::config::broker_config::BrokerConfig;
use crate::config::server_config::ServerConfig;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure matching config.yaml format
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub broker: BrokerConfig,
}

impl Config {
    /// Load configuration from YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_yaml::from_str(&content).with_context(|| "Failed to parse YAML config file")
    }

    /// Build the effective configuration: file (if any), then CLI overrides
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(timeout) = cli.timeout {
            self.server.default_timeout_secs = timeout;
        }
        if let Some(grace) = cli.shutdown_grace {
            self.server.shutdown_grace_secs = grace;
        }
        if let Some(zero_timeout) = cli.zero_timeout {
            self.server.zero_timeout = zero_timeout;
        }
        if let Some(max_queues) = cli.max_queues {
            self.broker.max_queues = max_queues;
        }
        if let Some(max_messages) = cli.max_messages {
            self.broker.max_messages = max_messages;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.broker.max_queues == 0 {
            bail!("max_queues must be at least 1");
        }
        if self.broker.max_messages == 0 {
            bail!("max_messages must be at least 1");
        }
        Ok(())
    }
}
