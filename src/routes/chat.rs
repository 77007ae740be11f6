//! Chat proxy endpoint
//!
//! Accepts `{ messages: [{role, content}] }` and forwards it upstream through
//! the fallback orchestrator.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{OriginalUri, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    error::AppError,
    proxy::{logging::RequestContext, normalize::parse_messages, ProxyResponse},
    routes::metrics::record_request,
    AppState,
};

/// Decode the raw request body
///
/// An empty body counts as `{}`. A body that is not JSON is echoed back as a
/// string in the 400 response.
fn decode_body(body: &Bytes) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Chat request body is not valid JSON");
        AppError::invalid_request(Value::String(String::from_utf8_lossy(body).into_owned()))
    })
}

/// Handle chat proxy requests
pub async fn gemini_chat(
    State(state): State<Arc<AppState>>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Result<Response, AppError> {
    let start_time = Instant::now();

    let result = proxy_chat(&state, uri.path(), &body).await;

    let duration = start_time.elapsed().as_secs_f64();
    let outcome = match &result {
        Ok(ProxyResponse::Upstream { status, .. }) if (200..300).contains(status) => "success",
        Ok(ProxyResponse::Upstream { .. }) => "upstream_error",
        Ok(ProxyResponse::Exhausted { .. }) => "exhausted",
        Err(AppError::InvalidRequest { .. }) => "invalid_request",
        Err(_) => "error",
    };
    record_request(outcome, duration);

    let response = result?;
    info!(
        path = %uri.path(),
        status = %response.status(),
        outcome = %outcome,
        duration_ms = %format!("{:.2}", duration * 1000.0),
        "Chat proxy request completed"
    );

    Ok(response.into_response())
}

async fn proxy_chat(state: &AppState, path: &str, body: &Bytes) -> Result<ProxyResponse, AppError> {
    let payload = decode_body(body)?;
    let messages = parse_messages(&payload)?;

    let ctx = RequestContext::new(path)
        .with_message_count(messages.len())
        .with_override(state.orchestrator.is_override_mode());

    state.orchestrator.run(&ctx, &messages).await
}

/// CORS preflight; headers are added by the router layer
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any method other than POST and OPTIONS
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
