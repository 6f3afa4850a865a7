//! Error types for landing-daemon

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Generic body for failures the caller cannot act on
pub const INTERNAL_ERROR_MESSAGE: &str = "Внутренняя ошибка сервера";

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Store unreachable or pool exhausted
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement rejected by the store
    #[error("Query error: {0}")]
    Query(String),

    /// Row could not be mapped
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Notification dispatch errors. Never fatal to a request.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Mail delivery is switched off in configuration
    #[error("notifications are disabled")]
    Disabled,

    /// Message could not be built (bad address, header, body)
    #[error("failed to compose message: {0}")]
    Compose(String),

    /// SMTP connection or protocol failure
    #[error("mail transport failed: {0}")]
    Transport(String),

    /// Dispatch did not finish in time
    #[error("mail dispatch timed out after {0:?}")]
    Timeout(Duration),
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or wrong credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Internal error, message is safe to show
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Log a storage failure in full and answer with a caller-safe message.
    pub fn storage(message: &str, err: StorageError) -> Self {
        tracing::error!(error = %err, "{}", message);
        ApiError::Internal(message.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m) | ApiError::Unauthorized(m) | ApiError::Internal(m) => m,
        }
    }
}

/// `{success, message}` body shared by failures and plain acknowledgements
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = MessageResponse::failure(self.message());

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;
