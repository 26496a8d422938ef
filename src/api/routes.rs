//! HTTP API route definitions.

use axum::http::{HeaderName, HeaderValue};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{echo, handle_panic, health, home, not_found, pipeline_info, AppState};
use crate::metrics::track_requests;

/// Endpoints listed in the 404 help payload.
pub const AVAILABLE_ENDPOINTS: [&str; 4] = ["/", "/health", "/api/echo", "/api/pipeline-info"];

/// Headers attached to every response.
const SECURITY_HEADERS: [(&str, &str); 3] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
];

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    with_middleware(
        Router::new()
            .route("/", get(home))
            .route("/health", get(health))
            .route("/api/echo", post(echo))
            .route("/api/pipeline-info", get(pipeline_info))
            .fallback(not_found)
            .with_state(state),
    )
}

/// Wrap a router in the service's middleware stack.
///
/// Layers run outermost first: security headers, request tracing, request
/// metrics, then panic recovery. Metrics sit outside panic recovery so a
/// panicking request is still counted as a 500.
pub fn with_middleware(router: Router) -> Router {
    let mut router = router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http());

    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
    }

    router
}
