use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::tool::ToolCall;

/// A single event emitted by the engine, tagged with the channel it arrived on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub channel: String,
    pub payload: Value,
}

impl RawEvent {
    pub fn new<S: Into<String>>(channel: S, payload: Value) -> Self {
        Self {
            channel: channel.into(),
            payload,
        }
    }

    /// Parse the `[channel, payload]` tuple form engines use on the wire.
    ///
    /// Anything that isn't a two element array led by a string is not an event.
    pub fn from_tuple(value: Value) -> Option<Self> {
        let Value::Array(mut items) = value else {
            return None;
        };
        if items.len() != 2 {
            return None;
        }
        let payload = items.pop()?;
        let channel = items.pop()?.as_str()?.to_string();
        Some(Self { channel, payload })
    }
}

/// The authorship discriminant a producer sets on each raw message, read from its `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Ai,
    AiChunk,
    Human,
    System,
    Tool,
    #[default]
    #[serde(other)]
    Unknown,
}

impl MessageKind {
    /// Whether the producer marked this message as assistant output, complete or partial
    pub fn is_assistant(self) -> bool {
        matches!(self, MessageKind::Ai | MessageKind::AiChunk)
    }

    fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

/// The content field of a raw message, in whichever shape the engine chose
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawContent {
    Text(String),
    Parts(Vec<Value>),
    Other(Value),
}

impl Default for RawContent {
    fn default() -> Self {
        RawContent::Other(Value::Null)
    }
}

impl From<Value> for RawContent {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => RawContent::Text(text),
            Value::Array(parts) => RawContent::Parts(parts),
            other => RawContent::Other(other),
        }
    }
}

/// A candidate message pulled out of a raw event
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RawMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: RawContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_kwargs: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_metadata: Option<Map<String, Value>>,
}

impl RawMessage {
    /// Read a raw message out of an engine value.
    ///
    /// Accepts both the flat form (`{ type, content, ... }`) and the serialized
    /// form (`{ type, data: { content, ... } }`). Returns `None` for anything that
    /// isn't an object. Malformed optional fields are treated as absent.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut outer) = value else {
            return None;
        };
        let kind = MessageKind::from_value(outer.get("type"));

        let mut fields = match outer.remove("data") {
            Some(Value::Object(data)) if !outer.contains_key("content") => data,
            Some(data) => {
                outer.insert("data".to_string(), data);
                outer
            }
            None => outer,
        };

        let content = fields
            .remove("content")
            .map(RawContent::from)
            .unwrap_or_default();
        let id = match fields.remove("id") {
            Some(Value::String(id)) if !id.is_empty() => Some(id),
            _ => None,
        };
        let tool_calls = match fields.remove("tool_calls") {
            Some(Value::Array(calls)) => Some(calls.into_iter().map(ToolCall::new).collect()),
            _ => None,
        };

        Some(RawMessage {
            kind,
            content,
            id,
            tool_calls,
            additional_kwargs: take_object(&mut fields, "additional_kwargs"),
            response_metadata: take_object(&mut fields, "response_metadata"),
        })
    }
}

fn take_object(fields: &mut Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    match fields.remove(key) {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}
