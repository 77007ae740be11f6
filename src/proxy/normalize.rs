//! Request normalization
//!
//! Validates the inbound chat body and renders it into each upstream
//! payload shape. Everything here is pure.

use serde_json::{json, Value};

use crate::error::{AppError, AppResult};

use super::types::{ChatMessage, PayloadShape};

/// Extract the `messages` list from an inbound request body
///
/// The list must be present, be an array, be non-empty and hold only objects
/// carrying a `content` key. Content and role values are not validated further.
pub fn parse_messages(body: &Value) -> AppResult<Vec<ChatMessage>> {
    let raw = body
        .get("messages")
        .and_then(Value::as_array)
        .filter(|messages| !messages.is_empty())
        .ok_or_else(|| AppError::invalid_request(body.clone()))?;

    raw.iter()
        .map(|message| {
            ChatMessage::from_value(message).ok_or_else(|| AppError::invalid_request(body.clone()))
        })
        .collect()
}

/// Author value understood by the GenerateMessage API
fn author_for(role: &str) -> &'static str {
    let role = role.trim();
    if role.eq_ignore_ascii_case("system") {
        "system"
    } else if role.eq_ignore_ascii_case("assistant") {
        "assistant"
    } else {
        "user"
    }
}

/// Render the conversation as a single role-tagged prompt
///
/// ```text
/// SYSTEM: be brief
///
/// USER: hello
/// ```
pub fn generate_content_payload(messages: &[ChatMessage]) -> Value {
    let combined = messages
        .iter()
        .map(|m| format!("{}: {}", m.role.to_uppercase(), m.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": combined }],
            }
        ]
    })
}

/// Render the conversation as one authored entry per message
pub fn generate_message_payload(messages: &[ChatMessage]) -> Value {
    let entries: Vec<Value> = messages
        .iter()
        .map(|m| {
            json!({
                "author": author_for(&m.role),
                "content": [{ "type": "text", "text": m.content }],
            })
        })
        .collect();

    json!({ "prompt": { "messages": entries } })
}

/// Build the upstream payload for the given shape
pub fn build_payload(shape: PayloadShape, messages: &[ChatMessage]) -> Value {
    match shape {
        PayloadShape::GenerateMessage => generate_message_payload(messages),
        PayloadShape::GenerateContent => generate_content_payload(messages),
    }
}
