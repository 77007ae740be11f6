//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus format for monitoring.

use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;

use crate::proxy::PayloadShape;

/// Global Prometheus handle for metrics export
static PROMETHEUS_HANDLE: Lazy<PrometheusHandle> = Lazy::new(|| {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
});

/// Initialize metrics (call once at startup)
pub fn init_metrics() {
    // Force initialization of the lazy static
    let _ = &*PROMETHEUS_HANDLE;

    register_metrics();
}

/// Register all custom metrics
fn register_metrics() {
    metrics::describe_counter!(
        "gemini_relay_requests_total",
        "Total number of chat requests processed"
    );
    metrics::describe_histogram!(
        "gemini_relay_request_duration_seconds",
        "Chat request duration in seconds, including every upstream attempt"
    );
    metrics::describe_counter!(
        "gemini_relay_upstream_attempts_total",
        "Total upstream attempts by payload shape and outcome"
    );
    metrics::describe_histogram!(
        "gemini_relay_upstream_attempt_duration_seconds",
        "Duration of single upstream attempts in seconds"
    );
}

/// Prometheus metrics endpoint handler
///
/// Returns metrics in Prometheus text format for scraping.
pub async fn prometheus_metrics() -> impl IntoResponse {
    PROMETHEUS_HANDLE.render()
}

/// Record a chat request
pub fn record_request(outcome: &str, duration_secs: f64) {
    metrics::counter!("gemini_relay_requests_total", "outcome" => outcome.to_string()).increment(1);
    metrics::histogram!("gemini_relay_request_duration_seconds").record(duration_secs);
}

/// Record one upstream attempt
pub fn record_attempt(shape: PayloadShape, outcome: &str, elapsed_ms: u64) {
    metrics::counter!(
        "gemini_relay_upstream_attempts_total",
        "shape" => shape.as_str(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gemini_relay_upstream_attempt_duration_seconds",
        "shape" => shape.as_str()
    )
    .record(elapsed_ms as f64 / 1000.0);
}
