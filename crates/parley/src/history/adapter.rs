use std::sync::Arc;

use super::{CheckpointStore, HistoryOutcome};
use crate::errors::HistoryError;
use crate::models::message::CanonicalMessage;
use crate::session::SessionStore;
use crate::stream::observer::{StreamObserver, TracingObserver};

/// Converts a session's stored history into canonical messages
#[derive(Clone)]
pub struct HistoryAdapter {
    sessions: Arc<dyn SessionStore>,
    checkpoints: Arc<dyn CheckpointStore>,
    observer: Arc<dyn StreamObserver>,
}

impl HistoryAdapter {
    pub fn new(sessions: Arc<dyn SessionStore>, checkpoints: Arc<dyn CheckpointStore>) -> Self {
        Self {
            sessions,
            checkpoints,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StreamObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Load the history for a session, keeping "no session yet" apart from failures
    pub async fn load(&self, session_id: &str) -> HistoryOutcome {
        match self.sessions.session_exists(session_id).await {
            Ok(true) => {}
            Ok(false) => return HistoryOutcome::NoHistory,
            Err(e) => return HistoryOutcome::Failed(HistoryError::Lookup(e)),
        }

        let stored = match self.checkpoints.fetch_history(session_id).await {
            Ok(stored) => stored,
            Err(e) => return HistoryOutcome::Failed(HistoryError::Fetch(e)),
        };

        let mut messages = Vec::with_capacity(stored.len());
        for (index, message) in stored.iter().enumerate() {
            match message.to_canonical() {
                Ok(canonical) => messages.push(canonical),
                Err(e) => {
                    return HistoryOutcome::Failed(HistoryError::Conversion {
                        index,
                        reason: e.to_string(),
                    })
                }
            }
        }
        HistoryOutcome::Populated(messages)
    }

    /// Load the history for a session, reporting failures to the observer and
    /// returning an empty list in their place
    pub async fn history_for(&self, session_id: &str) -> Vec<CanonicalMessage> {
        match self.load(session_id).await {
            HistoryOutcome::Failed(err) => {
                self.observer.on_history_error(session_id, &err);
                Vec::new()
            }
            outcome => outcome.into_messages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{MockCheckpointStore, StoredMessage};
    use crate::models::role::Role;
    use crate::session::MockSessionStore;
    use anyhow::anyhow;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sessions(exists: anyhow::Result<bool>) -> MockSessionStore {
        let mut store = MockSessionStore::new();
        let mut exists = Some(exists);
        store
            .expect_session_exists()
            .times(1)
            .returning(move |_| exists.take().unwrap());
        store
    }

    fn stored(value: serde_json::Value) -> StoredMessage {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_missing_session_is_no_history() {
        let mut checkpoints = MockCheckpointStore::new();
        checkpoints.expect_fetch_history().never();

        let adapter = HistoryAdapter::new(Arc::new(sessions(Ok(false))), Arc::new(checkpoints));
        assert!(matches!(adapter.load("unknown").await, HistoryOutcome::NoHistory));
    }

    #[tokio::test]
    async fn test_populated_history_in_order() {
        let mut checkpoints = MockCheckpointStore::new();
        checkpoints.expect_fetch_history().times(1).returning(|_| {
            Ok(vec![
                stored(json!({"type": "human", "data": {"id": "1", "content": "Hi"}})),
                stored(json!({"type": "ai", "data": {"id": "2", "content": "Hello!"}})),
            ])
        });

        let adapter = HistoryAdapter::new(Arc::new(sessions(Ok(true))), Arc::new(checkpoints));
        match adapter.load("s1").await {
            HistoryOutcome::Populated(messages) => {
                assert_eq!(messages.len(), 2);
                assert_eq!(messages[0].role, Role::Human);
                assert_eq!(messages[1].content(), "Hello!");
            }
            other => panic!("Expected populated history, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_distinguished() {
        let mut checkpoints = MockCheckpointStore::new();
        checkpoints
            .expect_fetch_history()
            .returning(|_| Err(anyhow!("checkpoint store offline")));

        let adapter = HistoryAdapter::new(Arc::new(sessions(Ok(true))), Arc::new(checkpoints));
        match adapter.load("s1").await {
            HistoryOutcome::Failed(HistoryError::Fetch(e)) => {
                assert_eq!(e.to_string(), "checkpoint store offline");
            }
            other => panic!("Expected fetch failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_conversion_failure_reports_index() {
        let mut checkpoints = MockCheckpointStore::new();
        checkpoints.expect_fetch_history().returning(|_| {
            Ok(vec![
                stored(json!({"type": "human", "data": {"content": "ok"}})),
                stored(json!({"type": "mystery", "data": {}})),
            ])
        });

        let adapter = HistoryAdapter::new(Arc::new(sessions(Ok(true))), Arc::new(checkpoints));
        assert!(matches!(
            adapter.load("s1").await,
            HistoryOutcome::Failed(HistoryError::Conversion { index: 1, .. })
        ));
    }

    #[tokio::test]
    async fn test_history_for_fails_soft_and_reports() {
        #[derive(Default)]
        struct Errors(AtomicUsize);

        impl StreamObserver for Errors {
            fn on_history_error(&self, _session_id: &str, _error: &HistoryError) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let mut checkpoints = MockCheckpointStore::new();
        checkpoints.expect_fetch_history().never();

        let observer = Arc::new(Errors::default());
        let adapter = HistoryAdapter::new(
            Arc::new(sessions(Err(anyhow!("database unreachable")))),
            Arc::new(checkpoints),
        )
        .with_observer(observer.clone());

        assert!(adapter.history_for("s1").await.is_empty());
        assert_eq!(observer.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_history_for_missing_session_is_empty() {
        let mut checkpoints = MockCheckpointStore::new();
        checkpoints.expect_fetch_history().never();

        let adapter = HistoryAdapter::new(Arc::new(sessions(Ok(false))), Arc::new(checkpoints));
        assert!(adapter.history_for("nobody").await.is_empty());
    }
}
