use anyhow::Result;
use std::sync::Arc;

use crate::configuration::Settings;
use crate::dispatcher::{StreamDispatcher, TurnRequest};
use crate::engine::EngineFactory;
use crate::history::{CheckpointStore, HistoryAdapter, HistoryOutcome};
use crate::models::message::CanonicalMessage;
use crate::session::SessionStore;
use crate::stream::classifier::ChunkClassifier;
use crate::stream::generator::{MessageStream, ResponseGenerator};
use crate::stream::observer::StreamObserver;

/// Entry point for consumers: streams turn responses and reads session history
#[derive(Clone)]
pub struct MessageService {
    dispatcher: StreamDispatcher,
    generator: ResponseGenerator,
    history: HistoryAdapter,
}

impl MessageService {
    pub fn new(
        settings: &Settings,
        sessions: Arc<dyn SessionStore>,
        engines: Arc<dyn EngineFactory>,
        checkpoints: Arc<dyn CheckpointStore>,
    ) -> Self {
        Self {
            dispatcher: StreamDispatcher::new(sessions.clone(), engines)
                .with_default_model(settings.stream.default_model.clone()),
            generator: ResponseGenerator::new(ChunkClassifier::from_settings(&settings.stream)),
            history: HistoryAdapter::new(sessions, checkpoints),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StreamObserver>) -> Self {
        self.generator = self.generator.with_observer(observer.clone());
        self.history = self.history.with_observer(observer);
        self
    }

    /// Run one turn and stream the assistant's messages as they arrive.
    ///
    /// Each call drives exactly one engine turn; the returned stream can't be restarted.
    pub async fn stream_response(&self, request: &TurnRequest) -> Result<MessageStream> {
        tracing::debug!(session_id = %request.session_id, "dispatching turn");
        let events = self.dispatcher.dispatch(request).await?;
        Ok(self.generator.generate(events))
    }

    /// Prior messages for a session; empty when there are none or they can't be loaded
    pub async fn history_for(&self, session_id: &str) -> Vec<CanonicalMessage> {
        self.history.history_for(session_id).await
    }

    /// Prior messages for a session, distinguishing absence from failure
    pub async fn load_history(&self, session_id: &str) -> HistoryOutcome {
        self.history.load(session_id).await
    }
}
