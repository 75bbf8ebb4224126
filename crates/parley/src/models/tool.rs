use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structured tool invocation emitted by the engine.
///
/// The dispatch layer never interprets tool calls, so the value is kept exactly as
/// the engine produced it. The accessors are read-only conveniences for callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCall(Value);

impl ToolCall {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The identifier the engine assigned to this call, if any
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// The name of the tool being invoked, if any
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// The arguments for the invocation, if any
    pub fn args(&self) -> Option<&Value> {
        self.0.get("args")
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ToolCall {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
