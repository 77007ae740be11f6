//! Health and metrics endpoint integration tests
//!
//! - GET /health - Full health check with upstream configuration
//! - GET /health/ready - Readiness probe
//! - GET /health/live - Liveness probe
//! - GET /metrics - Prometheus exposition

use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{create_test_server, TestConfig, UNREACHABLE_BASE};

fn config() -> TestConfig {
    TestConfig::new(
        format!("{}/m:generateMessage", UNREACHABLE_BASE),
        format!("{}/m:generateContent", UNREACHABLE_BASE),
    )
}

#[tokio::test]
async fn test_health_reports_default_mode() {
    let server = create_test_server(config());

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["checks"]["upstream"]["provider"], "gemini");
    assert_eq!(body["checks"]["upstream"]["mode"], "default");
    assert_eq!(body["checks"]["upstream"]["api_key_configured"], true);
    assert_eq!(body["checks"]["upstream"]["timeout_ms"], 2_000);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_reports_override_mode_and_missing_key() {
    let server = create_test_server(
        config()
            .with_override(format!("{}/custom", UNREACHABLE_BASE))
            .without_api_key(),
    );

    let body: Value = server.get("/health").await.json();

    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["upstream"]["mode"], "override");
    assert_eq!(body["checks"]["upstream"]["api_key_configured"], false);
}

#[tokio::test]
async fn test_readiness_depends_on_api_key() {
    let ready = create_test_server(config());
    let not_ready = create_test_server(config().without_api_key());

    let response = ready.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "healthy");

    let response = not_ready.get("/health/ready").await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["status"], "unhealthy");
}

#[tokio::test]
async fn test_liveness_always_ok() {
    let server = create_test_server(config().without_api_key());

    let response = server.get("/health/live").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_endpoint_renders_text() {
    gemini_relay::routes::metrics::init_metrics();
    let server = create_test_server(config());

    let response = server.get("/metrics").await;

    assert_eq!(response.status_code(), StatusCode::OK);
}
