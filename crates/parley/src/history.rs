//! Reading prior conversation turns back out of durable storage
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::HistoryError;
use crate::models::message::{CanonicalMessage, MessageData};
use crate::models::raw::{MessageKind, RawMessage};
use crate::models::role::Role;
use crate::stream::normalizer::{extract_text, fallback_id, has_tool_call};

pub mod adapter;
pub mod jsonl;

pub use adapter::HistoryAdapter;
pub use jsonl::JsonlCheckpointStore;

/// A message as the checkpoint store keeps it: a type tag plus its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub data: Value,
}

impl StoredMessage {
    pub fn from_canonical(message: &CanonicalMessage) -> Result<Self> {
        let kind = match message.role {
            Role::Ai => MessageKind::Ai,
            Role::Human => MessageKind::Human,
            Role::System => MessageKind::System,
            Role::Tool => MessageKind::Tool,
        };
        Ok(Self {
            kind,
            data: serde_json::to_value(&message.data)?,
        })
    }

    /// Convert into the caller-facing format
    pub fn to_canonical(&self) -> Result<CanonicalMessage> {
        let role = match self.kind {
            MessageKind::Ai | MessageKind::AiChunk => Role::Ai,
            MessageKind::Human => Role::Human,
            MessageKind::System => Role::System,
            MessageKind::Tool => Role::Tool,
            MessageKind::Unknown => bail!("unknown message type"),
        };
        let raw = RawMessage::from_value(self.data.clone())
            .ok_or_else(|| anyhow!("message data is not an object"))?;

        let content = if has_tool_call(&raw.content) {
            String::new()
        } else {
            extract_text(&raw.content)
        };

        Ok(CanonicalMessage {
            role,
            data: MessageData {
                id: raw.id.unwrap_or_else(fallback_id),
                content,
                tool_calls: raw.tool_calls,
                additional_kwargs: raw.additional_kwargs,
                response_metadata: raw.response_metadata,
            },
        })
    }
}

/// The outcome of loading a session's history
#[derive(Debug)]
pub enum HistoryOutcome {
    /// The session doesn't exist yet
    NoHistory,
    Failed(HistoryError),
    Populated(Vec<CanonicalMessage>),
}

impl HistoryOutcome {
    /// The loaded messages, with absence and failure both read as empty
    pub fn into_messages(self) -> Vec<CanonicalMessage> {
        match self {
            HistoryOutcome::Populated(messages) => messages,
            HistoryOutcome::NoHistory | HistoryOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Durable store of the messages exchanged in each session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Fetch the session's messages in the order they were exchanged
    async fn fetch_history(&self, session_id: &str) -> Result<Vec<StoredMessage>>;
}
