use crate::queue::ZeroTimeout;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config YAML file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Default GET timeout in seconds (0 - no wait)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum number of queues
    #[arg(long)]
    pub max_queues: Option<usize>,

    /// Maximum buffered messages per queue
    #[arg(long)]
    pub max_messages: Option<usize>,

    /// Seconds in-flight requests get to finish on shutdown
    #[arg(long)]
    pub shutdown_grace: Option<u64>,

    /// How a zero timeout is treated: return at once or wait indefinitely
    #[arg(long, value_enum)]
    pub zero_timeout: Option<ZeroTimeout>,

    /// Enable debug logging for internal details
    #[arg(short, long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["queue-broker"]);
        assert!(cli.config.is_none());
        assert!(cli.port.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "queue-broker",
            "--port",
            "9000",
            "--timeout",
            "3",
            "--max-queues",
            "5",
            "--max-messages",
            "20",
            "--zero-timeout",
            "forever",
            "--debug",
        ]);

        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.timeout, Some(3));
        assert_eq!(cli.max_queues, Some(5));
        assert_eq!(cli.max_messages, Some(20));
        assert_eq!(cli.zero_timeout, Some(ZeroTimeout::Forever));
        assert!(cli.debug);
    }

    #[test]
    fn test_rejects_negative_timeout() {
        assert!(Cli::try_parse_from(["queue-broker", "--timeout", "-1"]).is_err());
    }
}
