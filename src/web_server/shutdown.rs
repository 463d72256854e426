//! Termination signal handling
//!
//! Signals are counted on a watch channel: the first one starts a graceful
//! shutdown, a second one cuts the grace period short. Requests still running
//! when the shutdown is forced are cancelled through [`InFlight`].

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::signal;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

use super::error::ApiError;

/// Count of termination signals received so far
pub type ShutdownSignals = watch::Receiver<u32>;

/// Spawn a task that counts SIGINT/SIGTERM deliveries
pub fn spawn_signal_listener() -> ShutdownSignals {
    let (tx, rx) = watch::channel(0);
    tokio::spawn(async move {
        loop {
            termination().await;
            info!("Termination signal received");
            tx.send_modify(|count| *count += 1);
            if tx.is_closed() {
                break;
            }
        }
    });
    rx
}

/// Resolve once at least `count` signals have been received
pub async fn requested(signals: &mut ShutdownSignals, count: u32) {
    let closed = signals.wait_for(|received| *received >= count).await.is_err();
    if closed {
        // Nobody can signal anymore
        std::future::pending::<()>().await;
    }
}

/// Requests currently inside the router
#[derive(Clone, Default)]
pub struct InFlight {
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests whose handler is still running
    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Cancel every running handler and wait until all of them are dropped.
    ///
    /// Requests arriving afterwards are answered without reaching a handler.
    pub async fn abandon(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

/// Middleware running each request under the [`InFlight`] tracker.
///
/// On cancellation the handler future is dropped, which releases anything it
/// holds (a blocked receive deregisters its waiter), and the client gets 503.
pub async fn track_request(
    State(in_flight): State<InFlight>,
    request: Request,
    next: Next,
) -> Response {
    let _running = in_flight.tracker.token();
    tokio::select! {
        biased;
        _ = in_flight.cancel.cancelled() => ApiError::ShuttingDown.into_response(),
        response = next.run(request) => response,
    }
}

async fn termination() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl_c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
