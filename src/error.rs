//! Unified error types for the automation engine.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::error;

use crate::api::response::format_response;
use crate::api::routes::AVAILABLE_ENDPOINTS;

/// Message returned for rejected echo payloads.
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input data";

/// Message returned for unmatched routes.
pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";

/// Message returned for any internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Process-level error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-level error, rendered as a response envelope.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body was malformed, null, or an empty object.
    #[error("invalid input data")]
    InvalidInput,

    /// No route matched the request path.
    #[error("endpoint not found: {path}")]
    NotFound {
        /// Path that was requested.
        path: String,
    },

    /// Unexpected failure while handling the request. The detail is logged,
    /// never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Data payload placed inside the envelope.
    fn payload(&self) -> Map<String, Value> {
        let body = match self {
            ApiError::InvalidInput => json!({ "error": INVALID_INPUT_MESSAGE }),
            ApiError::NotFound { .. } => json!({
                "error": NOT_FOUND_MESSAGE,
                "available_endpoints": AVAILABLE_ENDPOINTS,
            }),
            ApiError::Internal(_) => json!({ "error": INTERNAL_ERROR_MESSAGE }),
        };

        match body {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(error = %detail, "Internal server error");
        }

        let status = self.status_code();
        (status, Json(format_response(self.payload()))).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type for request handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
