use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

const TITLE_LIMIT: usize = 100;

/// Durable record of which sessions exist
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Make sure the session exists, creating it from the first user text if needed
    async fn ensure_session(&self, session_id: &str, seed_text: &str) -> Result<()>;

    async fn session_exists(&self, session_id: &str) -> Result<bool>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub title: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(id: &str, seed_text: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title_from(seed_text),
            created_at: Utc::now(),
        }
    }
}

fn title_from(seed_text: &str) -> String {
    let trimmed = seed_text.trim();
    if trimmed.is_empty() {
        return "New conversation".to_string();
    }
    trimmed.chars().take(TITLE_LIMIT).collect()
}

/// Session store kept in process memory
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions.read().await.get(session_id).cloned()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn ensure_session(&self, session_id: &str, seed_text: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionRecord::new(session_id, seed_text));
        Ok(())
    }

    async fn session_exists(&self, session_id: &str) -> Result<bool> {
        Ok(self.sessions.read().await.contains_key(session_id))
    }
}
