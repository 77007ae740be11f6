//! Health check endpoints
//!
//! Provides endpoints for monitoring and container orchestration:
//! - `/health` - Full health check with upstream configuration status
//! - `/health/ready` - Readiness probe
//! - `/health/live` - Liveness probe

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

/// Health status enum
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Upstream configuration check
///
/// No network call is made; upstream reachability shows up in attempt
/// metrics instead.
#[derive(Debug, Serialize)]
pub struct UpstreamCheck {
    pub status: HealthStatus,
    pub provider: &'static str,
    /// `override` when an explicit URL is set, `default` otherwise
    pub mode: &'static str,
    pub api_key_configured: bool,
    pub timeout_ms: u64,
}

/// Dependency checks collection
#[derive(Debug, Serialize)]
pub struct DependencyChecks {
    pub upstream: UpstreamCheck,
}

/// Full health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: String,
    pub checks: DependencyChecks,
}

/// Simple health response for liveness/readiness
#[derive(Debug, Serialize)]
pub struct SimpleHealthResponse {
    pub status: HealthStatus,
}

fn check_upstream(state: &AppState) -> UpstreamCheck {
    let orchestrator = &state.orchestrator;
    let api_key_configured = orchestrator.has_api_key();

    UpstreamCheck {
        // Without a key every chat request fails with 500
        status: if api_key_configured {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        provider: orchestrator.upstream_name(),
        mode: if orchestrator.is_override_mode() {
            "override"
        } else {
            "default"
        },
        api_key_configured,
        timeout_ms: orchestrator.config().timeout.as_millis() as u64,
    }
}

/// Full health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let upstream = check_upstream(&state);

    let response = HealthResponse {
        status: upstream.status.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks: DependencyChecks { upstream },
    };

    (StatusCode::OK, Json(response))
}

/// Readiness probe endpoint
///
/// Returns 503 until an upstream API key is configured.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SimpleHealthResponse>) {
    if !state.orchestrator.has_api_key() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(SimpleHealthResponse {
                status: HealthStatus::Unhealthy,
            }),
        );
    }

    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}

/// Liveness probe endpoint
pub async fn liveness_check() -> (StatusCode, Json<SimpleHealthResponse>) {
    (
        StatusCode::OK,
        Json(SimpleHealthResponse {
            status: HealthStatus::Healthy,
        }),
    )
}
