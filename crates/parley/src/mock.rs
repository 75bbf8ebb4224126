use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::engine::{
    Engine, EngineConfig, EngineFactory, RawEventStream, StreamOptions, TurnInput,
};
use crate::models::raw::RawEvent;

/// Sets its flag when dropped, so tests can see when an engine stream was released
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// A stream replaying the given events, optionally never finishing afterwards
pub fn scripted_stream(
    events: Vec<Result<RawEvent>>,
    hold_open: bool,
    dropped: Arc<AtomicBool>,
) -> RawEventStream {
    let guard = DropFlag(dropped);
    Box::pin(async_stream::stream! {
        let _guard = guard;
        for event in events {
            yield event;
        }
        if hold_open {
            futures::future::pending::<()>().await;
        }
    })
}

/// An update event carrying the given agent messages
pub fn update(messages: Value) -> RawEvent {
    RawEvent::new("updates", json!({ "agent": { "messages": messages } }))
}

/// An update event carrying a single assistant text message
pub fn ai_text(id: &str, text: &str) -> RawEvent {
    update(json!([{ "type": "ai", "id": id, "content": text }]))
}

/// Records what the dispatcher asked of the engine
#[derive(Default)]
pub struct Recorded {
    pub configs: Vec<EngineConfig>,
    pub inputs: Vec<(TurnInput, StreamOptions)>,
}

/// An engine that replays a fixed list of events for a single turn
pub struct ScriptedEngine {
    events: Mutex<Option<Vec<Result<RawEvent>>>>,
    recorded: Arc<Mutex<Recorded>>,
    dropped: Arc<AtomicBool>,
    hold_open: bool,
    fail_open: bool,
}

#[async_trait]
impl Engine for ScriptedEngine {
    async fn open_stream(&self, input: TurnInput, options: StreamOptions) -> Result<RawEventStream> {
        self.recorded.lock().unwrap().inputs.push((input, options));
        if self.fail_open {
            return Err(anyhow!("stream refused"));
        }
        let events = self.events.lock().unwrap().take().unwrap_or_default();
        Ok(scripted_stream(events, self.hold_open, self.dropped.clone()))
    }
}

/// A factory handing out one scripted engine
pub struct ScriptedFactory {
    events: Mutex<Option<Vec<Result<RawEvent>>>>,
    pub recorded: Arc<Mutex<Recorded>>,
    pub dropped: Arc<AtomicBool>,
    hold_open: bool,
    fail_build: bool,
    fail_open: bool,
}

impl ScriptedFactory {
    pub fn new(events: Vec<Result<RawEvent>>) -> Self {
        Self {
            events: Mutex::new(Some(events)),
            recorded: Arc::new(Mutex::new(Recorded::default())),
            dropped: Arc::new(AtomicBool::new(false)),
            hold_open: false,
            fail_build: false,
            fail_open: false,
        }
    }

    /// Keep the engine stream open after the scripted events run out
    pub fn holding_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    pub fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn was_dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EngineFactory for ScriptedFactory {
    async fn build(&self, config: EngineConfig) -> Result<Box<dyn Engine>> {
        self.recorded.lock().unwrap().configs.push(config);
        if self.fail_build {
            return Err(anyhow!("model unavailable"));
        }
        Ok(Box::new(ScriptedEngine {
            events: Mutex::new(self.events.lock().unwrap().take()),
            recorded: self.recorded.clone(),
            dropped: self.dropped.clone(),
            hold_open: self.hold_open,
            fail_open: self.fail_open,
        }))
    }
}
