use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::handlers::{get_message, missing_queue_name, put_message, AppState};
use super::shutdown::{self, track_request, InFlight, ShutdownSignals};
use crate::config::server_config::ServerConfig;
use crate::queue::MessageBroker;

#[derive(Clone)]
pub struct WebServer {
    pub config: Arc<ServerConfig>,
    pub broker: Arc<dyn MessageBroker>,
}

impl WebServer {
    pub fn new(config: ServerConfig, broker: Arc<dyn MessageBroker>) -> Self {
        Self {
            config: Arc::new(config),
            broker,
        }
    }

    /// Bind, serve and stop on SIGINT/SIGTERM
    pub async fn start(&self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown::spawn_signal_listener()).await
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        // Convert localhost to 127.0.0.1 for proper parsing
        let host = if self.config.host == "localhost" {
            "127.0.0.1"
        } else {
            &self.config.host
        };
        let addr: SocketAddr = format!("{}:{}", host, self.config.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", host, self.config.port))?;

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        info!("🚀 Broker listening on http://{}", listener.local_addr()?);
        Ok(listener)
    }

    /// Serve until the first signal, then drain in-flight requests.
    ///
    /// Requests still running when the grace period ends, or when a second
    /// signal arrives, are cancelled and answered with 503. Either way every
    /// handler has finished before this returns.
    pub async fn serve(&self, listener: TcpListener, mut signals: ShutdownSignals) -> Result<()> {
        let in_flight = InFlight::new();
        let app = self
            .create_app()
            .layer(middleware::from_fn_with_state(in_flight.clone(), track_request));
        let stop = Arc::new(Notify::new());
        let graceful = {
            let stop = Arc::clone(&stop);
            async move { stop.notified().await }
        };
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(graceful)
                .await
        });

        tokio::select! {
            result = &mut server => {
                return result
                    .context("HTTP server task failed")?
                    .context("HTTP server error");
            }
            _ = shutdown::requested(&mut signals, 1) => {}
        }

        println!("🛑 Shutting down server...");
        stop.notify_one();

        let grace = self.config.shutdown_grace();
        let drained = tokio::select! {
            result = &mut server => {
                result
                    .context("HTTP server task failed")?
                    .context("HTTP server error")?;
                true
            }
            _ = tokio::time::sleep(grace) => {
                warn!("Grace period of {:?} elapsed, forcing shutdown", grace);
                false
            }
            _ = shutdown::requested(&mut signals, 2) => {
                warn!("Second termination signal, forcing shutdown");
                false
            }
        };

        if !drained {
            warn!("Abandoning {} in-flight requests", in_flight.len());
            in_flight.abandon().await;
            server.abort();
        }

        println!("✅ Server stopped");
        Ok(())
    }

    pub fn create_app(&self) -> Router {
        router(AppState {
            broker: Arc::clone(&self.broker),
            server: Arc::clone(&self.config),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/queue/", any(missing_queue_name))
        .route("/queue/:name", get(get_message).put(put_message))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
