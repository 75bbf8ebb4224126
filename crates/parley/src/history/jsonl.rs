use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{CheckpointStore, StoredMessage};
use crate::configuration::HistorySettings;

/// Checkpoint store keeping one `<session>.jsonl` file per session, one message per line
#[derive(Debug, Clone)]
pub struct JsonlCheckpointStore {
    dir: PathBuf,
}

impl JsonlCheckpointStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_settings(settings: &HistorySettings) -> Self {
        Self::new(settings.resolved_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn session_file(&self, session_id: &str) -> Result<PathBuf> {
        // Session ids become file names, so keep them inside the store directory
        if session_id.is_empty()
            || session_id.contains(|c: char| c == '/' || c == '\\')
            || session_id.contains("..")
        {
            return Err(anyhow!("Invalid session id: {:?}", session_id));
        }
        Ok(self.dir.join(format!("{}.jsonl", session_id)))
    }

    /// Append messages to the end of a session's history
    pub async fn append(&self, session_id: &str, messages: &[StoredMessage]) -> Result<()> {
        let path = self.session_file(session_id)?;
        fs::create_dir_all(&self.dir).await?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(encode(messages)?.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Replace a session's history with the given messages
    pub async fn persist(&self, session_id: &str, messages: &[StoredMessage]) -> Result<()> {
        let path = self.session_file(session_id)?;
        fs::create_dir_all(&self.dir).await?;
        fs::write(&path, encode(messages)?).await?;
        Ok(())
    }
}

fn encode(messages: &[StoredMessage]) -> Result<String> {
    let mut out = String::new();
    for message in messages {
        out.push_str(&serde_json::to_string(message)?);
        out.push('\n');
    }
    Ok(out)
}

#[async_trait]
impl CheckpointStore for JsonlCheckpointStore {
    async fn fetch_history(&self, session_id: &str) -> Result<Vec<StoredMessage>> {
        let path = self.session_file(session_id)?;
        if !fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(index, line)| {
                serde_json::from_str::<StoredMessage>(line)
                    .map_err(|e| anyhow!("Malformed history line {} in {}: {}", index + 1, path.display(), e))
            })
            .collect()
    }
}
