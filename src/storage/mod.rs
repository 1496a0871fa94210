//! Post storage backends
//!
//! The default backend writes one JSON file per post, named after the dedupe
//! key, so an existence check is a plain file stat. Any CMS-shaped backend
//! can replace it by implementing [`ContentStore`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::importer::{ContentStore, PostFields};

/// File-per-post store writing JSON documents under a root directory
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    /// Create a store rooted at the given directory
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the posts are written to
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn item_id(channel: &str, message_id: u64) -> String {
        format!("{channel}-{message_id}")
    }

    fn path_for_id(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    async fn write_post(&self, id: &str, fields: &PostFields) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let json = serde_json::to_string_pretty(fields)?;
        tokio::fs::write(self.path_for_id(id), json).await?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for JsonStore {
    async fn find_existing(
        &self,
        channel: &str,
        message_id: u64,
    ) -> anyhow::Result<Option<String>> {
        let id = Self::item_id(channel, message_id);
        match tokio::fs::try_exists(self.path_for_id(&id)).await? {
            true => Ok(Some(id)),
            false => Ok(None),
        }
    }

    async fn create(&self, fields: &PostFields) -> anyhow::Result<String> {
        let id = Self::item_id(&fields.channel, fields.message_id);
        self.write_post(&id, fields).await?;
        tracing::debug!(id = %id, "Created post file");
        Ok(id)
    }

    async fn update(&self, id: &str, fields: &PostFields) -> anyhow::Result<String> {
        self.write_post(id, fields).await?;
        tracing::debug!(id = %id, "Updated post file");
        Ok(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(channel: &str, message_id: u64, title: &str) -> PostFields {
        PostFields {
            title: title.to_string(),
            content: "content".to_string(),
            status: "draft".to_string(),
            author: None,
            category: None,
            published_at: None,
            channel: channel.to_string(),
            message_id,
            link: format!("https://t.me/{channel}/{message_id}"),
        }
    }

    #[tokio::test]
    async fn test_create_then_find() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        assert!(store.find_existing("chan", 1).await.unwrap().is_none());

        let id = store.create(&fields("chan", 1, "Title")).await.unwrap();
        assert_eq!(id, "chan-1");

        let found = store.find_existing("chan", 1).await.unwrap();
        assert_eq!(found.as_deref(), Some("chan-1"));
    }

    #[tokio::test]
    async fn test_update_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let id = store.create(&fields("chan", 2, "Old")).await.unwrap();
        store.update(&id, &fields("chan", 2, "New")).await.unwrap();

        let json = std::fs::read_to_string(dir.path().join("chan-2.json")).unwrap();
        let post: PostFields = serde_json::from_str(&json).unwrap();
        assert_eq!(post.title, "New");
    }

    #[tokio::test]
    async fn test_posts_keyed_per_channel() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        store.create(&fields("one", 7, "A")).await.unwrap();
        assert!(store.find_existing("two", 7).await.unwrap().is_none());
    }
}
