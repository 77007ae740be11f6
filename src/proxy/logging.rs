//! Request logging utilities for upstream proxying
//!
//! Provides structured logging with correlation IDs so every attempt made
//! for one inbound request can be traced together.

use std::time::Instant;
use tracing::{debug, error, info, warn, Span};
use uuid::Uuid;

use super::types::{AttemptResult, UpstreamTarget};

/// Context for tracking one inbound request across its upstream attempts
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Inbound route that received the request
    pub endpoint: String,
    /// Number of chat messages in the request
    pub message_count: usize,
    /// Whether an override URL drives target selection
    pub override_mode: bool,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(endpoint: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            endpoint: endpoint.to_string(),
            message_count: 0,
            override_mode: false,
        }
    }

    /// Set the number of chat messages
    pub fn with_message_count(mut self, count: usize) -> Self {
        self.message_count = count;
        self
    }

    /// Mark whether the override URL is in use
    pub fn with_override(mut self, override_mode: bool) -> Self {
        self.override_mode = override_mode;
        self
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self, planned_attempts: usize) {
        info!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            messages = %self.message_count,
            override_mode = %self.override_mode,
            planned_attempts = %planned_attempts,
            "Request started"
        );
    }

    /// Log an attempt being sent upstream
    pub fn log_upstream_request(&self, attempt: usize, target: &UpstreamTarget, body_size: usize) {
        debug!(
            trace_id = %self.trace_id,
            attempt = %attempt,
            url = %target.url,
            shape = %target.shape,
            body_size = %body_size,
            elapsed_ms = %self.elapsed_ms(),
            "Sending request to upstream"
        );
    }

    /// Log the classified result of an attempt
    pub fn log_attempt_result(&self, attempt: usize, result: &AttemptResult) {
        match (&result.http_status, &result.transport_error) {
            (Some(status), _) => info!(
                trace_id = %self.trace_id,
                attempt = %attempt,
                shape = %result.target.shape,
                status = %status,
                attempt_ms = %result.elapsed_ms,
                elapsed_ms = %self.elapsed_ms(),
                "Response received from upstream"
            ),
            (None, Some(err)) => self.log_connection_error(err, &result.target.url),
            (None, None) => warn!(
                trace_id = %self.trace_id,
                attempt = %attempt,
                "Attempt finished without status or error"
            ),
        }
    }

    /// Log a fallback to the next candidate
    pub fn log_fallback(&self, attempt: usize, reason: &str) {
        warn!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            attempt = %attempt,
            reason = %reason,
            elapsed_ms = %self.elapsed_ms(),
            "Falling back to next upstream target"
        );
    }

    /// Log successful request completion
    pub fn log_request_complete(&self, status: u16, attempts: usize) {
        info!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            status = %status,
            attempts = %attempts,
            elapsed_ms = %self.elapsed_ms(),
            "Request completed"
        );
    }

    /// Log that every planned attempt failed
    pub fn log_exhausted(&self, attempts: usize) {
        error!(
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            attempts = %attempts,
            elapsed_ms = %self.elapsed_ms(),
            "All upstream attempts failed"
        );
    }

    /// Log connection error (specific for debugging connectivity issues)
    pub fn log_connection_error(&self, error: &str, url: &str) {
        error!(
            trace_id = %self.trace_id,
            url = %url,
            elapsed_ms = %self.elapsed_ms(),
            error = %error,
            "Connection to upstream failed"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "relay_request",
            trace_id = %self.trace_id,
            endpoint = %self.endpoint,
            override_mode = %self.override_mode,
        )
    }
}
