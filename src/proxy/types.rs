//! Core data types for upstream proxying

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A single chat turn as sent by the frontend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// Raw role string; interpreted only when building upstream payloads
    pub role: String,
    pub content: String,
}

/// Role assumed when an entry carries no usable role
pub const DEFAULT_ROLE: &str = "user";

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Read one inbound entry, requiring only that it is an object with `content`
    ///
    /// Non-string content is rendered as its JSON text. A missing or non-string
    /// role falls back to [`DEFAULT_ROLE`].
    pub fn from_value(entry: &Value) -> Option<Self> {
        let object = entry.as_object()?;
        let content = match object.get("content")? {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let role = object
            .get("role")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_ROLE);

        Some(Self::new(role, content))
    }
}

/// Upstream payload schema variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayloadShape {
    GenerateMessage,
    GenerateContent,
}

impl PayloadShape {
    /// Label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadShape::GenerateMessage => "generate_message",
            PayloadShape::GenerateContent => "generate_content",
        }
    }
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Infer the payload shape an upstream URL expects from its method suffix
///
/// Matching is a case-insensitive substring test, so both
/// `...:generateContent` and `.../GENERATECONTENT?key=` are recognized.
pub fn infer_shape(url: &str) -> Option<PayloadShape> {
    let lowered = url.to_ascii_lowercase();
    if lowered.contains("generatecontent") {
        Some(PayloadShape::GenerateContent)
    } else if lowered.contains("generatemessage") {
        Some(PayloadShape::GenerateMessage)
    } else {
        None
    }
}

/// A (URL, shape) pair that one attempt is made against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpstreamTarget {
    pub url: String,
    pub shape: PayloadShape,
}

impl UpstreamTarget {
    pub fn new(url: impl Into<String>, shape: PayloadShape) -> Self {
        Self {
            url: url.into(),
            shape,
        }
    }
}

/// Upstream response body, classified once when the attempt completes
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    Json(Value),
    Text(String),
}

impl UpstreamBody {
    /// Classify captured body text as JSON when it parses, text otherwise
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => UpstreamBody::Json(value),
            Err(_) => UpstreamBody::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            UpstreamBody::Json(value) => Some(value),
            UpstreamBody::Text(_) => None,
        }
    }
}

/// Outcome of one upstream attempt
///
/// `succeeded` means the call completed and its body was read, whatever the
/// HTTP status. Use [`AttemptResult::is_success_status`] for a 2xx check.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptResult {
    pub target: UpstreamTarget,
    pub succeeded: bool,
    pub http_status: Option<u16>,
    pub body: Option<UpstreamBody>,
    pub raw_text: Option<String>,
    pub transport_error: Option<String>,
    pub elapsed_ms: u64,
}

impl AttemptResult {
    /// A call that returned a status and a readable body
    pub fn completed(target: UpstreamTarget, status: u16, text: String, elapsed_ms: u64) -> Self {
        Self {
            target,
            succeeded: true,
            http_status: Some(status),
            body: Some(UpstreamBody::from_text(text.clone())),
            raw_text: Some(text),
            transport_error: None,
            elapsed_ms,
        }
    }

    /// A call that never produced a usable response
    pub fn transport_failure(
        target: UpstreamTarget,
        error: impl fmt::Display,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            target,
            succeeded: false,
            http_status: None,
            body: None,
            raw_text: None,
            transport_error: Some(error.to_string()),
            elapsed_ms,
        }
    }

    pub fn is_success_status(&self) -> bool {
        matches!(self.http_status, Some(status) if (200..300).contains(&status))
    }

    /// Short outcome label for logs and metrics
    pub fn outcome(&self) -> &'static str {
        if !self.succeeded {
            "transport_error"
        } else if self.is_success_status() {
            "success"
        } else {
            "upstream_error"
        }
    }
}

/// Diagnostic view of an attempt, as exposed in aggregate failures
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttemptReport<'a> {
    url: &'a str,
    shape: PayloadShape,
    succeeded: bool,
    http_status: Option<u16>,
    parsed_body: Option<&'a Value>,
    raw_text: Option<&'a str>,
    transport_error: Option<&'a str>,
    elapsed_ms: u64,
}

impl Serialize for AttemptResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AttemptReport {
            url: &self.target.url,
            shape: self.target.shape,
            succeeded: self.succeeded,
            http_status: self.http_status,
            parsed_body: self.body.as_ref().and_then(UpstreamBody::as_json),
            raw_text: self.raw_text.as_deref(),
            transport_error: self.transport_error.as_deref(),
            elapsed_ms: self.elapsed_ms,
        }
        .serialize(serializer)
    }
}
