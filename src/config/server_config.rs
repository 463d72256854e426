use crate::queue::{WaitPolicy, ZeroTimeout};
use serde::Deserialize;
use std::time::Duration;

// Server section of the YAML config
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timeout in seconds applied to GET requests without `?timeout=`
    #[serde(default)]
    pub default_timeout_secs: u64,
    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,
    #[serde(default)]
    pub zero_timeout: ZeroTimeout,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_timeout_secs: 0,
            shutdown_grace_secs: default_shutdown_grace_secs(),
            zero_timeout: ZeroTimeout::default(),
        }
    }
}

impl ServerConfig {
    /// Wait policy for a request timeout, falling back to the default
    pub fn wait_policy(&self, timeout_secs: Option<u64>) -> WaitPolicy {
        WaitPolicy::from_secs(
            timeout_secs.unwrap_or(self.default_timeout_secs),
            self.zero_timeout,
        )
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_shutdown_grace_secs() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert_eq!(config.default_timeout_secs, 0);
        assert_eq!(config.shutdown_grace(), Duration::from_secs(5));
        assert_eq!(config.zero_timeout, ZeroTimeout::Poll);
    }

    #[test]
    fn test_server_config_partial_deserialization() {
        let yaml = r#"
port: 9000
zero_timeout: forever
"#;
        let config: ServerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0"); // default
        assert_eq!(config.zero_timeout, ZeroTimeout::Forever);
    }

    #[test]
    fn test_wait_policy_uses_default_timeout() {
        let config = ServerConfig {
            default_timeout_secs: 7,
            ..ServerConfig::default()
        };

        assert_eq!(
            config.wait_policy(None),
            WaitPolicy::For(Duration::from_secs(7))
        );
        assert_eq!(config.wait_policy(Some(0)), WaitPolicy::NoWait);
    }
}
