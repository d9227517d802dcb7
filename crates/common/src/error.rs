use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Common error types used across the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A required credential or identifier is missing from the settings store.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The remote webhook (or another remote resource) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The indexing API answered with a non-success status or could not be reached.
    #[error("Remote API error: {message}")]
    RemoteUpdate {
        status: Option<u16>,
        message: String,
    },

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn remote(status: Option<u16>, message: impl Into<String>) -> Self {
        AppError::RemoteUpdate {
            status,
            message: message.into(),
        }
    }

    /// HTTP status this error maps to when returned from a handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::RemoteUpdate { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Delivery(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::Database(_) => "Database error".to_string(),
            AppError::Config(msg)
            | AppError::NotFound(msg)
            | AppError::Delivery(msg)
            | AppError::Validation(msg)
            | AppError::Auth(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::RemoteUpdate { message, .. } => message.clone(),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = json!({ "error": message });
        (status, Json(body)).into_response()
    }
}
