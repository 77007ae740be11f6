//! Upstream attempt runner
//!
//! Defines the trait seam for issuing one upstream call and the reqwest-backed
//! implementation used in production.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use thiserror::Error;
use tracing::{debug, instrument};

use super::types::{AttemptResult, UpstreamTarget};

/// Reasons an attempt produced no usable response
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("upstream did not respond within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl TransportError {
    fn from_send(err: reqwest::Error) -> Self {
        if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// A single bounded-time upstream call
///
/// Implementations never return errors: every failure is classified into the
/// returned [`AttemptResult`]. They also never retry.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Get the upstream name for logging
    fn name(&self) -> &'static str;

    /// POST `body` to `target.url` and classify the outcome
    async fn attempt(
        &self,
        target: &UpstreamTarget,
        headers: &HeaderMap,
        body: String,
        timeout: Duration,
    ) -> AttemptResult;
}

/// Generative-language API client
pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a new client sharing the application's connection pool
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(
        &self,
        target: &UpstreamTarget,
        headers: &HeaderMap,
        body: String,
    ) -> Result<(u16, String), TransportError> {
        let response = self
            .client
            .post(&target.url)
            .headers(headers.clone())
            .body(body)
            .send()
            .await
            .map_err(TransportError::from_send)?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok((status, text))
    }
}

#[async_trait]
impl Upstream for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, headers, body), fields(url = %target.url, shape = %target.shape))]
    async fn attempt(
        &self,
        target: &UpstreamTarget,
        headers: &HeaderMap,
        body: String,
        timeout: Duration,
    ) -> AttemptResult {
        let start = Instant::now();

        // Dropping the send future on timeout cancels the in-flight call
        let outcome = match tokio::time::timeout(timeout, self.send(target, headers, body)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok((status, text)) => {
                debug!(status = %status, body_len = text.len(), "Upstream call completed");
                AttemptResult::completed(target.clone(), status, text, elapsed_ms)
            }
            Err(err) => {
                debug!(error = %err, "Upstream call failed");
                AttemptResult::transport_failure(target.clone(), err, elapsed_ms)
            }
        }
    }
}
