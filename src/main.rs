use anyhow::{Context, Result};
use clap::Parser;
use queue_broker::cli::Cli;
use queue_broker::queue::create_shared_broker;
use queue_broker::{Config, WebServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments first to get debug flag
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    let level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = Config::load(&cli).context("Failed to load configuration")?;

    let broker = create_shared_broker(config.broker.max_queues, config.broker.max_messages);
    let web_server = WebServer::new(config.server.clone(), broker);

    println!("🎯 Queue broker started");
    println!(
        "🌐 Listening on http://{}:{}",
        config.server.host, config.server.port
    );
    println!(
        "📦 Limits: {} queues, {} messages per queue, default timeout {}s",
        config.broker.max_queues, config.broker.max_messages, config.server.default_timeout_secs
    );
    println!("🛑 Press Ctrl+C to stop");

    web_server.start().await
}
