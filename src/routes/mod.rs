//! HTTP routes for Gemini Relay
//!
//! This module defines all HTTP endpoints exposed by the relay.

pub mod chat;
pub mod health;
pub mod metrics;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::AppState;

/// Chat paths served by the relay; `/chat` is kept for older frontends
pub const CHAT_PATHS: [&str; 2] = ["/api/gemini/chat", "/chat"];

/// POST proxies, OPTIONS answers preflight, everything else is 405
fn chat_route() -> MethodRouter<Arc<AppState>> {
    post(chat::gemini_chat)
        .options(chat::preflight)
        .fallback(chat::method_not_allowed)
}

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Permissive CORS headers on every chat response, preflight included
    let cors_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ));

    let chat_routes = CHAT_PATHS
        .iter()
        .fold(Router::new(), |router, path| router.route(path, chat_route()))
        .layer(cors_headers);

    // Public routes (health checks, metrics)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(metrics::prometheus_metrics));

    Router::new()
        .merge(public_routes)
        .merge(chat_routes)
        // Global middleware (applied to all routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
