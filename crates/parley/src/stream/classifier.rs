use serde_json::Value;

use crate::configuration::StreamSettings;
use crate::models::raw::RawEvent;

/// Picks candidate messages out of incremental-update events
#[derive(Debug, Clone)]
pub struct ChunkClassifier {
    update_channel: String,
    agent_node: String,
}

impl ChunkClassifier {
    pub fn new<C: Into<String>, N: Into<String>>(update_channel: C, agent_node: N) -> Self {
        Self {
            update_channel: update_channel.into(),
            agent_node: agent_node.into(),
        }
    }

    pub fn from_settings(settings: &StreamSettings) -> Self {
        Self::new(&settings.update_channel, &settings.agent_node)
    }

    /// Extract the candidate messages carried by an event.
    ///
    /// Only update-channel events with an object payload qualify. The candidates are
    /// the `messages` field of the agent node, with a lone value treated as a
    /// one-element list. Every other shape yields nothing.
    pub fn classify(&self, event: &RawEvent) -> Vec<Value> {
        if event.channel != self.update_channel {
            return Vec::new();
        }
        let Some(node) = event
            .payload
            .as_object()
            .and_then(|payload| payload.get(&self.agent_node))
            .and_then(Value::as_object)
        else {
            return Vec::new();
        };

        match node.get("messages") {
            Some(Value::Array(messages)) => messages.clone(),
            Some(message) => vec![message.clone()],
            None => Vec::new(),
        }
    }
}

impl Default for ChunkClassifier {
    fn default() -> Self {
        Self::from_settings(&StreamSettings::default())
    }
}
