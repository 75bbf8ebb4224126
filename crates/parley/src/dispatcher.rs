use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::engine::{EngineConfig, EngineFactory, RawEventStream, ResumeAction, StreamOptions, TurnInput};
use crate::session::SessionStore;

/// Per-request options supplied by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOptions {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub tools: Option<Vec<String>>,
    #[serde(default)]
    pub approve_all_tools: Option<bool>,
    /// Decision for a turn paused at a tool approval gate; `"allow"` continues it
    #[serde(default)]
    pub allow_tool: Option<String>,
}

/// A request to run one turn of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    pub session_id: String,
    pub user_text: String,
    #[serde(default)]
    pub options: Option<MessageOptions>,
}

impl TurnRequest {
    pub fn new<I: Into<String>, T: Into<String>>(session_id: I, user_text: T) -> Self {
        Self {
            session_id: session_id.into(),
            user_text: user_text.into(),
            options: None,
        }
    }

    pub fn with_options(mut self, options: MessageOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// The engine input for this request: resume when a tool decision is present,
    /// otherwise a new turn carrying the user text
    pub fn turn_input(&self) -> TurnInput {
        let decision = self
            .options
            .as_ref()
            .and_then(|options| options.allow_tool.as_deref())
            .filter(|decision| !decision.is_empty());

        match decision {
            Some(decision) => TurnInput::resume(ResumeAction::from_decision(decision)),
            None => TurnInput::new_turn(self.user_text.clone()),
        }
    }
}

/// Opens the engine's raw event stream for a turn
#[derive(Clone)]
pub struct StreamDispatcher {
    sessions: Arc<dyn SessionStore>,
    engines: Arc<dyn EngineFactory>,
    default_model: Option<String>,
}

impl StreamDispatcher {
    pub fn new(sessions: Arc<dyn SessionStore>, engines: Arc<dyn EngineFactory>) -> Self {
        Self {
            sessions,
            engines,
            default_model: None,
        }
    }

    pub fn with_default_model(mut self, model: Option<String>) -> Self {
        self.default_model = model;
        self
    }

    fn engine_config(&self, options: Option<&MessageOptions>) -> EngineConfig {
        let options = options.cloned().unwrap_or_default();
        EngineConfig {
            model: options.model.or_else(|| self.default_model.clone()),
            tools: options.tools,
            approve_all_tools: options.approve_all_tools,
        }
    }

    /// Make sure the session exists, then open the engine's update stream for this turn.
    ///
    /// Session, engine construction and stream open failures are returned as they are.
    /// Callers must not dispatch concurrently for the same session.
    pub async fn dispatch(&self, request: &TurnRequest) -> Result<RawEventStream> {
        self.sessions
            .ensure_session(&request.session_id, &request.user_text)
            .await?;

        let input = request.turn_input();
        let engine = self
            .engines
            .build(self.engine_config(request.options.as_ref()))
            .await?;

        engine
            .open_stream(input, StreamOptions::updates(request.session_id.clone()))
            .await
    }
}
