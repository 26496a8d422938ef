//! HTTP API handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::Uri;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::response::{format_response, Envelope};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::utils::{calculate_uptime, utc_timestamp, validate_input};

/// Service name reported by `GET /`.
pub const SERVICE_NAME: &str = "Automation Engine";

/// Message reported by `GET /`.
pub const SERVICE_MESSAGE: &str = "CI/CD Pipeline Demo - DevOps Engineering Excellence";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Configuration, loaded once at startup.
    pub config: Arc<Config>,
    /// When the server started, for uptime reporting.
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new app state starting now.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Turn a `json!` object literal into a payload map.
fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Service info handler.
pub async fn home(State(state): State<AppState>) -> Json<Envelope> {
    Json(format_response(object(json!({
        "service": SERVICE_NAME,
        "version": state.config.app_version,
        "status": "healthy",
        "timestamp": utc_timestamp(),
        "message": SERVICE_MESSAGE,
    }))))
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> Json<Envelope> {
    Json(format_response(object(json!({
        "status": "healthy",
        "timestamp": utc_timestamp(),
        "uptime": calculate_uptime(state.started_at),
    }))))
}

/// Echo handler - returns the submitted JSON payload.
///
/// The body is parsed explicitly so malformed JSON is a validation failure
/// (400), never an internal error.
pub async fn echo(body: Bytes) -> ApiResult<Json<Envelope>> {
    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => value,
        Err(e) => {
            debug!("Rejected echo body: {}", e);
            metrics::inc_echo_rejected();
            return Err(ApiError::InvalidInput);
        }
    };

    if !validate_input(&payload) {
        warn!("Rejected echo payload: null or empty object");
        metrics::inc_echo_rejected();
        return Err(ApiError::InvalidInput);
    }

    Ok(Json(format_response(object(json!({
        "echo": payload,
        "timestamp": utc_timestamp(),
        "processed": true,
    })))))
}

/// Pipeline metadata handler - fixed description plus build info.
pub async fn pipeline_info(State(state): State<AppState>) -> Json<Envelope> {
    let build = state.config.build_info();

    Json(format_response(object(json!({
        "pipeline": {
            "ci_stages": [
                "Code Checkout",
                "Python Linting (pylint, black, isort)",
                "Unit Tests (pytest)",
                "Docker Build",
                "Security Scan (Trivy)",
            ],
            "cd_stages": [
                "Docker Push to Hub",
                "Update K8s Manifests",
                "GitOps Deployment",
            ],
            "quality_gates": {
                "pylint_score": "≥ 8.0/10",
                "test_coverage": "≥ 80%",
                "security_scan": "No HIGH/CRITICAL CVEs",
            },
            "technologies": [
                "GitHub Actions",
                "Docker",
                "Kubernetes",
                "Trivy Security Scanner",
                "Python Flask",
            ],
        },
        "build_info": {
            "commit_sha": build.commit_sha,
            "build_number": build.build_number,
            "branch": build.branch,
        },
    }))))
}

/// Fallback handler for unmatched paths.
pub async fn not_found(uri: Uri) -> ApiError {
    debug!(path = %uri.path(), "No route matched");
    ApiError::NotFound {
        path: uri.path().to_string(),
    }
}

/// Convert a handler panic into the 500 envelope.
pub fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}
