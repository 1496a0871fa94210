//! Short-lived review snapshots
//!
//! The preview command saves what it fetched so a later import can act on the
//! exact same list without refetching. Snapshots are keyed per actor, expire
//! after [`REVIEW_TTL`], and the newest write always wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::parser::Message;

/// How long a saved preview stays valid
pub const REVIEW_TTL: chrono::Duration = chrono::Duration::seconds(600);

/// One saved preview: the channel it came from and the messages shown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSnapshot {
    pub channel: String,
    pub messages: Vec<Message>,
    pub saved_at: DateTime<Utc>,
}

impl ReviewSnapshot {
    #[must_use]
    pub fn new(channel: &str, messages: Vec<Message>) -> Self {
        Self {
            channel: channel.to_string(),
            messages,
            saved_at: Utc::now(),
        }
    }

    fn is_expired(&self) -> bool {
        Utc::now() - self.saved_at > REVIEW_TTL
    }
}

/// Storage for per-actor review snapshots
///
/// An expired snapshot is indistinguishable from a missing one.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn put(&self, actor: &str, snapshot: ReviewSnapshot) -> anyhow::Result<()>;
    async fn get(&self, actor: &str) -> anyhow::Result<Option<ReviewSnapshot>>;
}

/// In-memory review store, suitable for a single process
#[derive(Default)]
pub struct MemoryReviewStore {
    snapshots: Mutex<HashMap<String, ReviewSnapshot>>,
}

impl MemoryReviewStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for MemoryReviewStore {
    async fn put(&self, actor: &str, snapshot: ReviewSnapshot) -> anyhow::Result<()> {
        let mut snapshots = self
            .snapshots
            .lock()
            .map_err(|_| anyhow::anyhow!("review store lock poisoned"))?;
        snapshots.insert(actor.to_string(), snapshot);
        Ok(())
    }

    async fn get(&self, actor: &str) -> anyhow::Result<Option<ReviewSnapshot>> {
        let mut snapshots = self
            .snapshots
            .lock()
            .map_err(|_| anyhow::anyhow!("review store lock poisoned"))?;

        match snapshots.get(actor) {
            Some(snapshot) if snapshot.is_expired() => {
                snapshots.remove(actor);
                Ok(None)
            }
            Some(snapshot) => Ok(Some(snapshot.clone())),
            None => Ok(None),
        }
    }
}

/// File-backed review store, one JSON file per actor
///
/// Survives process restarts, which matters because preview and import are
/// separate CLI invocations.
pub struct FileReviewStore {
    dir: PathBuf,
}

impl FileReviewStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, actor: &str) -> PathBuf {
        // Actor names become filenames; anything unusual is flattened
        let safe: String = actor
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("review-{safe}.json"))
    }
}

#[async_trait]
impl ReviewStore for FileReviewStore {
    async fn put(&self, actor: &str, snapshot: ReviewSnapshot) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(&snapshot)?;
        tokio::fs::write(self.path_for(actor), json).await?;
        Ok(())
    }

    async fn get(&self, actor: &str) -> anyhow::Result<Option<ReviewSnapshot>> {
        let path = self.path_for(actor);
        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: ReviewSnapshot = serde_json::from_str(&json)?;
        if snapshot.is_expired() {
            let _ = tokio::fs::remove_file(&path).await;
            return Ok(None);
        }

        Ok(Some(snapshot))
    }
}
