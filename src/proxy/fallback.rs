//! Fallback orchestration across upstream targets
//!
//! Plans at most two (URL, shape) attempts for a request, runs them one after
//! another, and turns the last attempt into the client-facing response.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::Instrument;

use crate::{
    error::{AppError, AppResult},
    routes::metrics::record_attempt,
};

use super::{
    headers::build_upstream_headers,
    logging::RequestContext,
    normalize::build_payload,
    types::{infer_shape, AttemptResult, ChatMessage, PayloadShape, UpstreamBody, UpstreamTarget},
    upstream::Upstream,
};

/// Hard cap on upstream calls per inbound request
pub const MAX_ATTEMPTS: usize = 2;

/// Orchestrator settings, built from [`crate::Config::fallback_config`]
#[derive(Debug, Clone)]
pub struct FallbackConfig {
    /// Explicit upstream URL; replaces the default targets when set
    pub override_url: Option<String>,
    /// Upstream secret; requests fail fast without it
    pub api_key: Option<String>,
    /// Per-attempt wall-clock timeout
    pub timeout: Duration,
    /// Targets tried in order when no override is set
    pub default_targets: Vec<UpstreamTarget>,
}

/// When a completed attempt ends the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopWhen {
    /// The call completed, whatever its HTTP status
    Completed,
    /// The call completed with a 2xx status
    Success2xx,
}

impl StopWhen {
    fn accepts(&self, result: &AttemptResult) -> bool {
        match self {
            StopWhen::Completed => result.succeeded,
            StopWhen::Success2xx => result.succeeded && result.is_success_status(),
        }
    }
}

/// One step of an attempt plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAttempt {
    pub target: UpstreamTarget,
    pub stop_when: StopWhen,
}

impl PlannedAttempt {
    fn new(target: UpstreamTarget, stop_when: StopWhen) -> Self {
        Self { target, stop_when }
    }
}

/// Client-facing outcome of one proxied request
#[derive(Debug)]
pub enum ProxyResponse {
    /// Body of the accepted attempt, forwarded verbatim with its own status
    ///
    /// `body` only decides the content type; `raw_text` is what gets sent.
    Upstream {
        status: u16,
        body: UpstreamBody,
        raw_text: String,
    },
    /// Every planned attempt failed to complete
    Exhausted { attempts: Vec<AttemptResult> },
}

impl ProxyResponse {
    /// The last attempt decides the response; earlier ones only matter on failure
    fn from_attempts(mut attempts: Vec<AttemptResult>) -> Self {
        match attempts.pop() {
            Some(last) if last.succeeded => ProxyResponse::Upstream {
                status: last.http_status.unwrap_or(502),
                body: last
                    .body
                    .unwrap_or_else(|| UpstreamBody::Text(String::new())),
                raw_text: last.raw_text.unwrap_or_default(),
            },
            Some(last) => {
                attempts.push(last);
                ProxyResponse::Exhausted { attempts }
            }
            None => ProxyResponse::Exhausted { attempts },
        }
    }

    /// Status code sent to the caller
    pub fn status(&self) -> u16 {
        match self {
            ProxyResponse::Upstream { status, .. } => *status,
            ProxyResponse::Exhausted { .. } => StatusCode::BAD_GATEWAY.as_u16(),
        }
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        match self {
            ProxyResponse::Upstream {
                status,
                body,
                raw_text,
            } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let content_type = match body {
                    UpstreamBody::Json(_) => "application/json",
                    UpstreamBody::Text(_) => "text/plain; charset=utf-8",
                };
                (status, [(header::CONTENT_TYPE, content_type)], raw_text).into_response()
            }
            ProxyResponse::Exhausted { attempts } => (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "All upstream attempts failed",
                    "details": { "attempts": attempts },
                })),
            )
                .into_response(),
        }
    }
}

/// Sequences upstream attempts for each request
pub struct FallbackOrchestrator {
    upstream: Arc<dyn Upstream>,
    config: FallbackConfig,
}

impl FallbackOrchestrator {
    /// Create a new orchestrator
    pub fn new(upstream: Arc<dyn Upstream>, config: FallbackConfig) -> Self {
        Self { upstream, config }
    }

    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Name of the upstream implementation, for health reporting
    pub fn upstream_name(&self) -> &'static str {
        self.upstream.name()
    }

    /// Whether a usable secret is configured
    pub fn has_api_key(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Whether an override URL replaces the default targets
    pub fn is_override_mode(&self) -> bool {
        self.override_url().is_some()
    }

    /// Non-blank override URL, if any
    fn override_url(&self) -> Option<&str> {
        self.config
            .override_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Decide which targets to try and when to stop
    pub fn plan(&self) -> AppResult<Vec<PlannedAttempt>> {
        if let Some(url) = self.override_url() {
            let plan = match infer_shape(url) {
                Some(shape) => vec![PlannedAttempt::new(
                    UpstreamTarget::new(url, shape),
                    StopWhen::Completed,
                )],
                None => vec![
                    PlannedAttempt::new(
                        UpstreamTarget::new(url, PayloadShape::GenerateMessage),
                        StopWhen::Success2xx,
                    ),
                    PlannedAttempt::new(
                        UpstreamTarget::new(url, PayloadShape::GenerateContent),
                        StopWhen::Completed,
                    ),
                ],
            };
            return Ok(plan);
        }

        if self.config.default_targets.is_empty() {
            return Err(AppError::InvalidConfiguration(
                "No upstream targets configured".to_string(),
            ));
        }

        Ok(self
            .config
            .default_targets
            .iter()
            .take(MAX_ATTEMPTS)
            .map(|target| PlannedAttempt::new(target.clone(), StopWhen::Completed))
            .collect())
    }

    /// Proxy one chat request through the planned attempts
    ///
    /// Fails before any network call when the secret is missing or no target
    /// can be planned. Upstream failures never surface as errors.
    pub async fn run(
        &self,
        ctx: &RequestContext,
        messages: &[ChatMessage],
    ) -> AppResult<ProxyResponse> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::InvalidConfiguration("GEMINI_API_KEY not set in env".to_string())
            })?;
        let headers = build_upstream_headers(api_key)?;
        let plan = self.plan()?;

        let span = ctx.create_span();
        async move {
            ctx.log_request_start(plan.len());

            let mut attempts: Vec<AttemptResult> = Vec::with_capacity(plan.len());
            for (index, step) in plan.iter().enumerate() {
                let attempt = index + 1;
                if index > 0 {
                    if let Some(previous) = attempts.last() {
                        ctx.log_fallback(attempt, fallback_reason(previous));
                    }
                }

                let body = build_payload(step.target.shape, messages).to_string();
                ctx.log_upstream_request(attempt, &step.target, body.len());

                let result = self
                    .upstream
                    .attempt(&step.target, &headers, body, self.config.timeout)
                    .await;
                ctx.log_attempt_result(attempt, &result);
                record_attempt(step.target.shape, result.outcome(), result.elapsed_ms);

                let stop = step.stop_when.accepts(&result);
                attempts.push(result);
                if stop {
                    break;
                }
            }

            let made = attempts.len();
            let response = ProxyResponse::from_attempts(attempts);
            match &response {
                ProxyResponse::Upstream { status, .. } => ctx.log_request_complete(*status, made),
                ProxyResponse::Exhausted { .. } => ctx.log_exhausted(made),
            }
            Ok::<_, AppError>(response)
        }
        .instrument(span)
        .await
    }
}

fn fallback_reason(previous: &AttemptResult) -> &'static str {
    match previous.outcome() {
        "transport_error" => "previous attempt failed in transport",
        "upstream_error" => "previous attempt returned a non-2xx status",
        _ => "previous attempt was not accepted",
    }
}
