use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::raw::RawEvent;

/// The lazy sequence of raw events an engine produces for one turn.
///
/// Dropping the stream must release whatever the engine holds open for it.
pub type RawEventStream = BoxStream<'static, Result<RawEvent>>;

/// What to do with a turn that paused at an approval gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeAction {
    Continue,
    Update,
}

impl ResumeAction {
    /// `"allow"` continues the paused turn; every other decision is an update
    pub fn from_decision(decision: &str) -> Self {
        if decision == "allow" {
            ResumeAction::Continue
        } else {
            ResumeAction::Update
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeCommand {
    pub action: ResumeAction,
    pub data: Value,
}

impl ResumeCommand {
    pub fn new(action: ResumeAction) -> Self {
        Self {
            action,
            data: json!({}),
        }
    }
}

/// A message written by the caller to start a new turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanMessage {
    pub content: String,
}

impl HumanMessage {
    pub fn new<S: Into<String>>(content: S) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// The input handed to the engine: either resume a paused turn or start a new one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnInput {
    Resume(ResumeCommand),
    NewTurn { messages: Vec<HumanMessage> },
}

impl TurnInput {
    pub fn resume(action: ResumeAction) -> Self {
        TurnInput::Resume(ResumeCommand::new(action))
    }

    pub fn new_turn<S: Into<String>>(text: S) -> Self {
        TurnInput::NewTurn {
            messages: vec![HumanMessage::new(text)],
        }
    }
}

/// How the engine should be configured for a turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub model: Option<String>,
    pub tools: Option<Vec<String>>,
    pub approve_all_tools: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamMode {
    /// Step-by-step state updates
    Updates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamOptions {
    pub session_id: String,
    pub modes: Vec<StreamMode>,
}

impl StreamOptions {
    /// Options for a stream that emits only incremental updates for the given session
    pub fn updates<S: Into<String>>(session_id: S) -> Self {
        Self {
            session_id: session_id.into(),
            modes: vec![StreamMode::Updates],
        }
    }
}

/// A configured conversational engine
#[async_trait]
pub trait Engine: Send + Sync {
    /// Run one turn, returning the raw events it produces
    async fn open_stream(&self, input: TurnInput, options: StreamOptions) -> Result<RawEventStream>;
}

/// Builds engines for a given configuration
#[async_trait]
pub trait EngineFactory: Send + Sync {
    async fn build(&self, config: EngineConfig) -> Result<Box<dyn Engine>>;
}
