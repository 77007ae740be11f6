//! Gemini Relay - chat proxy for generative-language APIs
//!
//! This library provides the core functionality for the relay server.
//! It validates chat requests from the frontend, renders them into the
//! upstream payload shapes, and falls back between shapes and endpoints
//! within a bounded latency budget.

pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

pub use crate::config::Config;
pub use crate::proxy::{FallbackOrchestrator, GeminiClient, Upstream};

/// Application state shared across all request handlers
pub struct AppState {
    pub start_time: Instant,
    /// Orchestrator running upstream attempts for each chat request
    pub orchestrator: Arc<FallbackOrchestrator>,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: &Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        // Per-attempt timeouts are enforced by the orchestrator, not the client
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(16)
            .build()?;

        let upstream: Arc<dyn Upstream> = Arc::new(GeminiClient::new(http_client));

        Ok(Self::with_upstream(config, upstream))
    }

    /// Create an application state around an existing upstream implementation
    pub fn with_upstream(config: &Config, upstream: Arc<dyn Upstream>) -> Self {
        let orchestrator = Arc::new(FallbackOrchestrator::new(
            upstream,
            config.fallback_config(),
        ));

        Self {
            start_time: Instant::now(),
            orchestrator,
        }
    }
}
