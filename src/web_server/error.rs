use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::debug;

use crate::queue::BrokerError;

/// Failures reported to HTTP clients
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Broker(#[from] BrokerError),
    #[error("Queue name is required")]
    MissingQueueName,
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Message is required")]
    EmptyMessage,
    #[error("Invalid timeout value")]
    InvalidTimeout,
    #[error("Server is shutting down")]
    ShuttingDown,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Broker(e) if e.is_resource_exhausted() => StatusCode::SERVICE_UNAVAILABLE,
            Self::Broker(_) => StatusCode::NOT_FOUND,
            Self::ShuttingDown => StatusCode::SERVICE_UNAVAILABLE,
            Self::MissingQueueName
            | Self::InvalidBody
            | Self::EmptyMessage
            | Self::InvalidTimeout => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        debug!("Responding {} ({})", status, self);
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_broker_error_status_codes() {
        assert_eq!(
            ApiError::from(BrokerError::QueueFull).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(BrokerError::QueueLimitReached).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(BrokerError::MessageNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_client_errors_are_bad_request() {
        for error in [
            ApiError::MissingQueueName,
            ApiError::InvalidBody,
            ApiError::EmptyMessage,
            ApiError::InvalidTimeout,
        ] {
            assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_broker_error_text_is_passed_through() {
        assert_eq!(
            ApiError::from(BrokerError::QueueFull).to_string(),
            "queue is full"
        );
    }

    #[test]
    fn test_shutting_down_is_unavailable() {
        assert_eq!(
            ApiError::ShuttingDown.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
