use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("Query exceeded its time budget of {0:?}")]
    Timeout(Duration),

    #[error("Config error: {0}")]
    Config(String),
}

impl AppError {
    /// Stable machine-readable error kind, shared by the HTTP body and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRange(_) => "invalid_range",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::StorageUnavailable(_) => "storage_unavailable",
            AppError::Timeout(_) => "timeout",
            AppError::Config(_) => "config",
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StorageUnavailable(_) | AppError::Timeout(_))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRange(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::StorageUnavailable(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                "Storage unavailable".to_string()
            }
            AppError::Timeout(budget) => {
                tracing::error!(budget = ?budget, "Query timed out");
                self.to_string()
            }
            AppError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Internal server error".to_string()
            }
            AppError::InvalidRange(ref msg)
            | AppError::InvalidInput(ref msg)
            | AppError::NotFound(ref msg) => msg.clone(),
        };

        let body = Json(json!({
            "error": message,
            "kind": self.kind(),
            "retryable": self.is_retryable(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
