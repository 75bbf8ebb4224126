use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::role::Role;
use super::tool::ToolCall;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// The payload of a canonical message
///
/// `content` is empty whenever `tool_calls` is set; otherwise it holds non-blank text.
pub struct MessageData {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_kwargs: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A message in the caller-facing protocol, serialized as `{ "type": ..., "data": ... }`
pub struct CanonicalMessage {
    #[serde(rename = "type")]
    pub role: Role,
    pub data: MessageData,
}

impl CanonicalMessage {
    /// Create an assistant text message
    pub fn text<I: Into<String>, S: Into<String>>(id: I, content: S) -> Self {
        CanonicalMessage {
            role: Role::Ai,
            data: MessageData {
                id: id.into(),
                content: content.into(),
                ..Default::default()
            },
        }
    }

    /// Create an assistant tool-call message, which always has empty content
    pub fn tool_call<I: Into<String>>(
        id: I,
        tool_calls: Option<Vec<ToolCall>>,
        additional_kwargs: Option<Map<String, Value>>,
        response_metadata: Option<Map<String, Value>>,
    ) -> Self {
        CanonicalMessage {
            role: Role::Ai,
            data: MessageData {
                id: id.into(),
                content: String::new(),
                tool_calls,
                additional_kwargs,
                response_metadata,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn content(&self) -> &str {
        &self.data.content
    }

    pub fn is_tool_call(&self) -> bool {
        self.data.tool_calls.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_variant_shape() -> anyhow::Result<()> {
        let message = CanonicalMessage::text("msg_1", "hello");
        let value = serde_json::to_value(&message)?;
        assert_eq!(
            value,
            json!({"type": "ai", "data": {"id": "msg_1", "content": "hello"}})
        );
        Ok(())
    }

    #[test]
    fn test_tool_call_variant_shape() -> anyhow::Result<()> {
        let call = ToolCall::new(json!({"id": "c1", "name": "search", "args": {"q": "rust"}}));
        let mut kwargs = Map::new();
        kwargs.insert("source".to_string(), json!("engine"));

        let message = CanonicalMessage::tool_call("msg_2", Some(vec![call]), Some(kwargs), None);
        let value = serde_json::to_value(&message)?;

        assert_eq!(value["type"], json!("ai"));
        assert_eq!(value["data"]["content"], json!(""));
        assert_eq!(value["data"]["tool_calls"][0]["name"], json!("search"));
        assert_eq!(value["data"]["additional_kwargs"]["source"], json!("engine"));
        assert!(value["data"].get("response_metadata").is_none());
        Ok(())
    }

    #[test]
    fn test_deserialize_history_shape() -> anyhow::Result<()> {
        let message: CanonicalMessage = serde_json::from_value(json!({
            "type": "human",
            "data": {"id": "u1", "content": "hi there"}
        }))?;
        assert_eq!(message.role, Role::Human);
        assert_eq!(message.content(), "hi there");
        assert!(!message.is_tool_call());
        Ok(())
    }
}
