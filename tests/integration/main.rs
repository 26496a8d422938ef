//! End-to-end tests for the Automation Engine HTTP surface.
//!
//! Each test builds the full router (same middleware stack as the binary)
//! and drives it with `tower::ServiceExt::oneshot`.

use automation_engine::api::routes::with_middleware;
use automation_engine::api::{create_router, AppState};
use automation_engine::config::Config;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use pretty_assertions::assert_eq;
use regex::Regex;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> axum::Router {
    create_router(AppState::new(Config::default()))
}

async fn get(path: &str) -> Response {
    app()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_json(path: &str, body: impl Into<Body>) -> Response {
    app()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.into())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn top_level_keys(json: &Value) -> Vec<String> {
    json.as_object().unwrap().keys().cloned().collect()
}

fn timestamp_pattern() -> Regex {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$").unwrap()
}

#[tokio::test]
async fn home_endpoint() {
    let response = get("/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["service"]
        .as_str()
        .unwrap()
        .contains("Automation Engine"));
    assert_eq!(json["data"]["version"], "1.0.0");
}

#[tokio::test]
async fn response_envelope_has_exactly_three_keys() {
    let json = body_json(get("/").await).await;

    assert_eq!(top_level_keys(&json), vec!["success", "data", "timestamp"]);
    assert!(json["success"].is_boolean());
    assert!(timestamp_pattern().is_match(json["timestamp"].as_str().unwrap()));
}

#[tokio::test]
async fn health_check() {
    let response = get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "healthy");
    assert!(timestamp_pattern().is_match(json["data"]["timestamp"].as_str().unwrap()));

    let uptime = Regex::new(r"^\d+d \d+h \d+m \d+s$").unwrap();
    assert!(uptime.is_match(json["data"]["uptime"].as_str().unwrap()));
}

#[tokio::test]
async fn echo_endpoint_valid_data() {
    let payload = json!({ "message": "Hello CI/CD Pipeline" });
    let response = post_json("/api/echo", payload.to_string()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["echo"], payload);
    assert_eq!(json["data"]["processed"], true);
}

#[tokio::test]
async fn echo_preserves_key_order() {
    let raw = r#"{"zeta":1,"alpha":{"y":2,"b":3},"mid":[true,null]}"#;
    let json = body_json(post_json("/api/echo", raw).await).await;

    assert_eq!(json["data"]["echo"].to_string(), raw);
}

#[tokio::test]
async fn echo_endpoint_invalid_data() {
    let response = post_json("/api/echo", "{}").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["data"]["error"], "Invalid input data");
}

#[tokio::test]
async fn echo_malformed_json_is_bad_request() {
    for body in ["{\"message\":", "", "null"] {
        let response = post_json("/api/echo", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {:?}", body);

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["error"], "Invalid input data");
    }
}

#[tokio::test]
async fn echo_accepts_empty_string_and_list() {
    for body in ["\"\"", "[]"] {
        let response = post_json("/api/echo", body).await;
        assert_eq!(response.status(), StatusCode::OK, "body {:?}", body);
    }
}

#[tokio::test]
async fn pipeline_info_endpoint() {
    let response = get("/api/pipeline-info").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    let pipeline = &json["data"]["pipeline"];
    assert_eq!(pipeline["ci_stages"].as_array().unwrap().len(), 5);
    assert_eq!(pipeline["cd_stages"].as_array().unwrap().len(), 3);
    assert_eq!(pipeline["quality_gates"]["test_coverage"], "≥ 80%");
    assert!(pipeline["technologies"]
        .as_array()
        .unwrap()
        .contains(&json!("Kubernetes")));
}

#[tokio::test]
async fn pipeline_info_build_metadata_fallbacks() {
    let json = body_json(get("/api/pipeline-info").await).await;

    assert_eq!(
        json["data"]["build_info"],
        json!({ "commit_sha": "local-dev", "build_number": "0", "branch": "main" })
    );
}

#[tokio::test]
async fn pipeline_info_build_metadata_from_config() {
    let config = Config {
        github_sha: Some("0123abcd".to_string()),
        github_run_number: Some("17".to_string()),
        github_ref_name: Some("feature/x".to_string()),
        ..Config::default()
    };
    let response = create_router(AppState::new(config))
        .oneshot(
            Request::builder()
                .uri("/api/pipeline-info")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = body_json(response).await;
    assert_eq!(
        json["data"]["build_info"],
        json!({ "commit_sha": "0123abcd", "build_number": "17", "branch": "feature/x" })
    );
}

#[tokio::test]
async fn not_found_error() {
    let response = get("/nonexistent").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["data"]["error"]
        .as_str()
        .unwrap()
        .to_lowercase()
        .contains("not found"));
    assert_eq!(
        json["data"]["available_endpoints"],
        json!(["/", "/health", "/api/echo", "/api/pipeline-info"])
    );
}

#[tokio::test]
async fn security_headers_present() {
    let response = get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
}

async fn boom() -> &'static str {
    panic!("handler failure")
}

#[tokio::test]
async fn panicking_handler_becomes_500_envelope() {
    let router = with_middleware(axum::Router::new().route("/boom", axum::routing::get(boom)));

    let response = router
        .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.headers()["x-frame-options"], "DENY");

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["data"], json!({ "error": "Internal server error" }));
}
