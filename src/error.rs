//! Error types for Gemini Relay
//!
//! Only local failures are errors here. Upstream trouble is folded into
//! `AttemptResult` and surfaced through `ProxyResponse`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Hint returned with every malformed chat request
pub const EXPECTED_SHAPE_HINT: &str = "Expected { messages: [{role, content}, ...] }";

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request: {message}")]
    InvalidRequest {
        message: String,
        received_body: Value,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl AppError {
    /// Malformed inbound payload, echoing what was received
    pub fn invalid_request(received_body: Value) -> Self {
        AppError::InvalidRequest {
            message: EXPECTED_SHAPE_HINT.to_string(),
            received_body,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_body: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InvalidRequest {
                message,
                received_body,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Invalid request".to_string(),
                    message: Some(message),
                    received_body: Some(received_body),
                },
            ),
            AppError::InvalidConfiguration(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: message,
                    message: None,
                    received_body: None,
                },
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse {
                    error: "Method Not Allowed".to_string(),
                    message: None,
                    received_body: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
