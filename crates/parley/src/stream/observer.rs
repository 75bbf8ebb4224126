use crate::errors::HistoryError;
use crate::models::message::CanonicalMessage;
use crate::models::raw::{RawEvent, RawMessage};

/// Hook for watching messages move through the pipeline.
///
/// Every method has an empty default so implementations only override what they need.
pub trait StreamObserver: Send + Sync {
    /// A raw event was pulled from the engine
    fn on_event(&self, _event: &RawEvent) {}

    /// A candidate message was classified, along with whether it was assistant output
    fn on_candidate(&self, _message: &RawMessage, _accepted: bool) {}

    /// A canonical message is about to be yielded
    fn on_message(&self, _message: &CanonicalMessage) {}

    /// Loading history for a session failed
    fn on_history_error(&self, _session_id: &str, _error: &HistoryError) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StreamObserver for NoopObserver {}

/// Observer that forwards pipeline activity to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl StreamObserver for TracingObserver {
    fn on_event(&self, event: &RawEvent) {
        tracing::debug!(channel = %event.channel, "received engine event");
    }

    fn on_candidate(&self, message: &RawMessage, accepted: bool) {
        tracing::debug!(kind = ?message.kind, accepted, "classified candidate message");
    }

    fn on_message(&self, message: &CanonicalMessage) {
        tracing::debug!(
            id = %message.id(),
            tool_call = message.is_tool_call(),
            "emitting message"
        );
    }

    fn on_history_error(&self, session_id: &str, error: &HistoryError) {
        tracing::error!(session_id, "failed to load history: {}", error);
    }
}
