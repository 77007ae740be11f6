//! Mock generative-language API for testing
//!
//! Provides wiremock-based mocks for the two upstream method families:
//! - POST `{MESSAGE_PATH}` - GenerateMessage
//! - POST `{CONTENT_PATH}` - GenerateContent
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::mocks::gemini::MockGemini;
//!
//! #[tokio::test]
//! async fn test_with_gemini_mock() {
//!     let mock = MockGemini::start().await;
//!     mock.mock_content_success("Hello!").await;
//!
//!     // Use mock.content_url() as GEMINI_CONTENT_URL
//! }
//! ```

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Path of the GenerateMessage endpoint on the mock server
pub const MESSAGE_PATH: &str = "/v1beta2/models/chat-bison-001:generateMessage";
/// Path of the GenerateContent endpoint on the mock server
pub const CONTENT_PATH: &str = "/v1/models/gemini-1.5-flash:generateContent";
/// Path with no shape hint, for ambiguous override URLs
pub const PLAIN_PATH: &str = "/v1/models/custom-chat";

/// API key the relay under test is configured with
pub const TEST_API_KEY: &str = "test-gemini-api-key";

/// Mock upstream server wrapper
pub struct MockGemini {
    server: MockServer,
}

impl MockGemini {
    /// Start a new mock upstream server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn message_url(&self) -> String {
        format!("{}{}", self.server.uri(), MESSAGE_PATH)
    }

    pub fn content_url(&self) -> String {
        format!("{}{}", self.server.uri(), CONTENT_PATH)
    }

    pub fn plain_url(&self) -> String {
        format!("{}{}", self.server.uri(), PLAIN_PATH)
    }

    // =========================================================================
    // Response bodies
    // =========================================================================

    /// GenerateContent success body
    pub fn content_response(text: &str) -> Value {
        json!({
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [{ "text": text }]
                    },
                    "finishReason": "STOP"
                }
            ]
        })
    }

    /// GenerateMessage success body
    pub fn message_response(text: &str) -> Value {
        json!({
            "candidates": [{ "author": "1", "content": text }],
            "messages": []
        })
    }

    /// Upstream error body in the API's own format
    pub fn error_response(code: u16, message: &str, status: &str) -> Value {
        json!({
            "error": { "code": code, "message": message, "status": status }
        })
    }

    // =========================================================================
    // Mounting helpers
    // =========================================================================

    /// Respond on `at` with a JSON body; only requests carrying the test key match
    pub async fn mock_json(&self, at: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(at))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Respond on `at` with a plain text body
    pub async fn mock_text(&self, at: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Respond on `at` with exact body bytes under the given content type
    pub async fn mock_raw(&self, at: &str, status: u16, body: &str, content_type: &str) {
        Mock::given(method("POST"))
            .and(path(at))
            .respond_with(
                ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), content_type),
            )
            .mount(&self.server)
            .await;
    }

    /// Respond on `at` only after `delay`
    pub async fn mock_delayed(&self, at: &str, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(at))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(Self::content_response("too late"))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Successful GenerateContent call
    pub async fn mock_content_success(&self, text: &str) {
        self.mock_json(CONTENT_PATH, 200, Self::content_response(text))
            .await;
    }

    /// Successful GenerateMessage call
    pub async fn mock_message_success(&self, text: &str) {
        self.mock_json(MESSAGE_PATH, 200, Self::message_response(text))
            .await;
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// All requests received so far as (path, JSON body) pairs
    pub async fn received(&self) -> Vec<(String, Value)> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|request| {
                let body = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
                (request.url.path().to_string(), body)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_content_success_requires_api_key() {
        let mock = MockGemini::start().await;
        mock.mock_content_success("hi").await;

        let client = reqwest::Client::new();
        let with_key = client
            .post(mock.content_url())
            .header("x-goog-api-key", TEST_API_KEY)
            .header("content-type", "application/json")
            .body("{}")
            .send()
            .await
            .unwrap();
        let without_key = client
            .post(mock.content_url())
            .body("{}")
            .send()
            .await
            .unwrap();

        assert_eq!(with_key.status(), 200);
        assert_eq!(without_key.status(), 404);
    }

    #[tokio::test]
    async fn test_received_records_paths_and_bodies() {
        let mock = MockGemini::start().await;
        mock.mock_text(PLAIN_PATH, 200, "ok").await;

        reqwest::Client::new()
            .post(mock.plain_url())
            .body(r#"{"a":1}"#)
            .send()
            .await
            .unwrap();

        let received = mock.received().await;
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0, PLAIN_PATH);
        assert_eq!(received[0].1, json!({"a": 1}));
    }
}
