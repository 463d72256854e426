use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ApiError;
use crate::config::server_config::ServerConfig;
use crate::queue::MessageBroker;

#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<dyn MessageBroker>,
    pub server: Arc<ServerConfig>,
}

#[derive(Deserialize)]
struct PutRequest {
    message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GetParams {
    timeout: Option<String>,
}

pub async fn put_message(
    State(state): State<AppState>,
    Path(queue_name): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let request: PutRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejected PUT to {}: {}", queue_name, e);
        ApiError::InvalidBody
    })?;

    if request.message.is_empty() {
        return Err(ApiError::EmptyMessage);
    }

    state.broker.put(&queue_name, request.message).await?;
    debug!("📨 Accepted message for {}", queue_name);
    Ok(StatusCode::OK)
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(queue_name): Path<String>,
    Query(params): Query<GetParams>,
) -> Result<Json<MessageResponse>, ApiError> {
    let timeout = parse_timeout(params.timeout.as_deref())?;
    let wait = state.server.wait_policy(timeout);
    debug!("GET {} ({:?})", queue_name, wait);

    let message = state.broker.get(&queue_name, wait).await?;
    Ok(Json(MessageResponse {
        message: message.into_payload(),
    }))
}

pub async fn missing_queue_name() -> ApiError {
    ApiError::MissingQueueName
}

/// Seconds from the `timeout` query parameter; empty means "not given"
fn parse_timeout(raw: Option<&str>) -> Result<Option<u64>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            warn!("Invalid timeout value: {:?}", value);
            ApiError::InvalidTimeout
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout(None).unwrap(), None);
        assert_eq!(parse_timeout(Some("")).unwrap(), None);
        assert_eq!(parse_timeout(Some("0")).unwrap(), Some(0));
        assert_eq!(parse_timeout(Some("15")).unwrap(), Some(15));
    }

    #[test]
    fn test_parse_timeout_rejects_garbage() {
        assert!(matches!(
            parse_timeout(Some("-1")),
            Err(ApiError::InvalidTimeout)
        ));
        assert!(matches!(
            parse_timeout(Some("soon")),
            Err(ApiError::InvalidTimeout)
        ));
    }
}
