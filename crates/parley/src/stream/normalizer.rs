use serde_json::Value;
use uuid::Uuid;

use crate::models::message::CanonicalMessage;
use crate::models::raw::{RawContent, RawMessage};

/// Generate an id for a message the engine didn't label
pub fn fallback_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether a content part is a tool invocation rather than text
fn is_tool_call_part(part: &Value) -> bool {
    let Some(object) = part.as_object() else {
        return false;
    };
    object.contains_key("functionCall")
        || object.get("type").and_then(Value::as_str) == Some("tool_use")
}

/// Whether the message content marks this as a tool-call message
pub fn has_tool_call(content: &RawContent) -> bool {
    match content {
        RawContent::Parts(parts) => parts.iter().any(is_tool_call_part),
        _ => false,
    }
}

/// Flatten message content into plain text.
///
/// Parts are concatenated in order without separators: strings as-is, objects by
/// their `text` field, anything else as nothing.
pub fn extract_text(content: &RawContent) -> String {
    match content {
        RawContent::Text(text) => text.clone(),
        RawContent::Parts(parts) => parts
            .iter()
            .map(|part| match part {
                Value::String(text) => text.as_str(),
                other => other.get("text").and_then(Value::as_str).unwrap_or(""),
            })
            .collect(),
        RawContent::Other(Value::Null) => String::new(),
        RawContent::Other(Value::String(text)) => text.clone(),
        RawContent::Other(other) => other.to_string(),
    }
}

/// Convert an assistant message into its canonical form.
///
/// Tool-call messages always produce a message with empty content, carrying the
/// tool calls and metadata through untouched. Text messages produce a message only
/// when the extracted text isn't blank.
pub fn normalize(message: &RawMessage) -> Option<CanonicalMessage> {
    let id = || message.id.clone().unwrap_or_else(fallback_id);

    if has_tool_call(&message.content) {
        return Some(CanonicalMessage::tool_call(
            id(),
            message.tool_calls.clone(),
            message.additional_kwargs.clone(),
            message.response_metadata.clone(),
        ));
    }

    let text = extract_text(&message.content);
    if text.trim().is_empty() {
        return None;
    }
    Some(CanonicalMessage::text(id(), text))
}
