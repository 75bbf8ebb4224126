use anyhow::Result;
use futures::stream::{BoxStream, StreamExt};
use std::sync::Arc;

use super::classifier::ChunkClassifier;
use super::filter::is_assistant_message;
use super::normalizer::normalize;
use super::observer::{StreamObserver, TracingObserver};
use crate::engine::RawEventStream;
use crate::models::message::CanonicalMessage;
use crate::models::raw::RawMessage;

/// The lazy sequence of canonical messages produced for one turn
pub type MessageStream = BoxStream<'static, Result<CanonicalMessage>>;

/// Composes classification, filtering and normalization over an engine's event stream
#[derive(Clone)]
pub struct ResponseGenerator {
    classifier: ChunkClassifier,
    observer: Arc<dyn StreamObserver>,
}

impl ResponseGenerator {
    pub fn new(classifier: ChunkClassifier) -> Self {
        Self {
            classifier,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StreamObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Create a stream that yields each assistant message as soon as its event arrives.
    ///
    /// Messages keep the order of their events, and within an event the order of its
    /// candidates. An engine error ends the stream with that error. Dropping the
    /// returned stream drops the engine stream with it.
    pub fn generate(&self, mut events: RawEventStream) -> MessageStream {
        let classifier = self.classifier.clone();
        let observer = Arc::clone(&self.observer);

        Box::pin(async_stream::try_stream! {
            while let Some(event) = events.next().await {
                let event = event?;
                observer.on_event(&event);

                for candidate in classifier.classify(&event) {
                    if let Some(message) = RawMessage::from_value(candidate) {
                        let accepted = is_assistant_message(&message);
                        observer.on_candidate(&message, accepted);
                        if !accepted {
                            continue;
                        }
                        if let Some(canonical) = normalize(&message) {
                            observer.on_message(&canonical);
                            yield canonical;
                        }
                    }
                }
            }
        })
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new(ChunkClassifier::default())
    }
}
