//! Error taxonomy shared by every layer and its JSON rendering.

use std::time::Duration;

use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Underlying failure text attached to 5xx responses. Only written into the
/// body when the service runs in development mode.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("{0}")]
    Validation(String),

    #[error("File upload error: {0}")]
    Upload(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Authorization(String),

    #[error("Too many requests, please try again later.")]
    TooManyRequests { retry_after: Duration },

    #[error("Request entity too large")]
    PayloadTooLarge,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Reference id {0} already exists")]
    DuplicateReference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{message}: {detail}")]
    Failed {
        message: &'static str,
        detail: String,
    },
}

impl ApiError {
    pub fn not_found() -> Self {
        ApiError::NotFound("Application not found".into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFields(_) | ApiError::Validation(_) | ApiError::Upload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Replaces server-side failures with the public message of the operation that
/// hit them; client errors pass through untouched.
pub trait ResultExt<T> {
    fn context(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T> ResultExt<T> for Result<T, ApiError> {
    fn context(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|err| match err.status() {
            StatusCode::INTERNAL_SERVER_ERROR => match err {
                ApiError::Failed { .. } => err,
                other => ApiError::Failed {
                    message,
                    detail: other.to_string(),
                },
            },
            _ => err,
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::MissingFields(missing) => (
                status,
                Json(json!({
                    "success": false,
                    "error": "Missing required fields",
                    "missing": missing,
                })),
            )
                .into_response(),
            ApiError::Upload(message) => (
                status,
                Json(json!({
                    "success": false,
                    "error": "File upload error",
                    "message": message,
                })),
            )
                .into_response(),
            ApiError::Validation(message) | ApiError::NotFound(message) => {
                (status, Json(json!({ "success": false, "error": message }))).into_response()
            }
            ApiError::TooManyRequests { retry_after } => {
                let mut response = (
                    status,
                    Json(json!({
                        "success": false,
                        "error": "Too many requests, please try again later.",
                    })),
                )
                    .into_response();
                if let Ok(v) = HeaderValue::from_str(&retry_after.as_secs().max(1).to_string()) {
                    response.headers_mut().insert(RETRY_AFTER, v);
                }
                response
            }
            ApiError::PayloadTooLarge => (
                status,
                Json(json!({ "success": false, "error": "Request entity too large" })),
            )
                .into_response(),
            other => {
                let (message, detail) = match other {
                    ApiError::Failed { message, detail } => (message, detail),
                    other => ("Internal server error", other.to_string()),
                };
                tracing::error!("{}: {}", message, &detail);
                let mut response =
                    (status, Json(json!({ "success": false, "error": message }))).into_response();
                response.extensions_mut().insert(ErrorDetail(detail));
                response
            }
        }
    }
}
