//! Import pipeline: turn collected messages into stored posts
//!
//! The importer is storage-agnostic: anything implementing [`ContentStore`]
//! can receive posts. Each message is gated on an existence check keyed by
//! (channel, message id) so re-running an import never duplicates content.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::sanitize::{has_content, strip_html_tags, truncate_chars};
use crate::parser::{Message, MessageParser};

/// Maximum title length in characters
pub const TITLE_MAX_CHARS: usize = 80;

/// Fallback title when a message has no usable text
fn default_title(id: u64) -> String {
    format!("Telegram post #{id}")
}

/// Everything a store needs to persist one post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostFields {
    /// Plain-text title, at most [`TITLE_MAX_CHARS`] characters
    pub title: String,

    /// HTML content: body with the title removed, then media fragments
    pub content: String,

    /// Publication status requested by the operator (e.g. "draft")
    pub status: String,

    /// Author identifier in the target store
    pub author: Option<String>,

    /// Category or collection name in the target store
    pub category: Option<String>,

    /// Publication timestamp from the source message, when parsable
    pub published_at: Option<DateTime<Utc>>,

    /// Source channel name, part of the dedupe key
    pub channel: String,

    /// Source message id, part of the dedupe key
    pub message_id: u64,

    /// Canonical permalink back to the source message
    pub link: String,
}

/// Persistence target for imported posts
///
/// Implementations return an opaque item id; the importer only threads it
/// through for updates.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Look up a previously imported post by its dedupe key
    async fn find_existing(
        &self,
        channel: &str,
        message_id: u64,
    ) -> anyhow::Result<Option<String>>;

    /// Create a new post, returning its id
    async fn create(&self, fields: &PostFields) -> anyhow::Result<String>;

    /// Overwrite an existing post in place
    async fn update(&self, id: &str, fields: &PostFields) -> anyhow::Result<String>;
}

/// Operator choices for one import run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Status assigned to every created post
    pub status: String,

    /// Author assigned to every created post
    pub author: Option<String>,

    /// Category assigned to every created post
    pub category: Option<String>,

    /// When true, existing posts are updated instead of skipped
    pub overwrite_existing: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            status: "draft".to_string(),
            author: None,
            category: None,
            overwrite_existing: false,
        }
    }
}

/// Counts from one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ImportSummary {
    /// Human-readable one-line outcome
    ///
    /// The updated count is only mentioned when overwriting was requested,
    /// since it is always zero otherwise.
    #[must_use]
    pub fn outcome(&self, overwrite: bool) -> String {
        if overwrite {
            format!(
                "Imported {} posts, updated {} existing posts, skipped {} posts.",
                self.imported, self.updated, self.skipped
            )
        } else {
            format!(
                "Imported {} posts, skipped {} posts.",
                self.imported, self.skipped
            )
        }
    }
}

/// Importer binding a parser (for title removal) to a content store
pub struct Importer<'a, S: ContentStore> {
    store: &'a S,
    parser: &'a dyn MessageParser,
}

impl<'a, S: ContentStore> Importer<'a, S> {
    pub fn new(store: &'a S, parser: &'a dyn MessageParser) -> Self {
        Self { store, parser }
    }

    /// Import a batch of messages from one channel
    ///
    /// Failures on individual messages are logged and counted, never fatal;
    /// the remaining messages still get their chance.
    pub async fn import_batch(
        &self,
        channel: &str,
        messages: &[Message],
        options: &ImportOptions,
    ) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for msg in messages {
            match self.import_one(channel, msg, options).await {
                Ok(Outcome::Created) => summary.imported += 1,
                Ok(Outcome::Updated) => summary.updated += 1,
                Ok(Outcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    tracing::warn!(
                        channel = %channel,
                        message_id = msg.id,
                        error = %e,
                        "Failed to import message"
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            channel = %channel,
            imported = summary.imported,
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "Import batch complete"
        );

        summary
    }

    async fn import_one(
        &self,
        channel: &str,
        msg: &Message,
        options: &ImportOptions,
    ) -> anyhow::Result<Outcome> {
        let existing = self.store.find_existing(channel, msg.id).await?;

        if existing.is_some() && !options.overwrite_existing {
            tracing::debug!(message_id = msg.id, "Already imported, skipping");
            return Ok(Outcome::Skipped);
        }

        let fields = self.build_fields(channel, msg, options);

        match existing {
            Some(id) => {
                self.store.update(&id, &fields).await?;
                Ok(Outcome::Updated)
            }
            None => {
                self.store.create(&fields).await?;
                Ok(Outcome::Created)
            }
        }
    }

    /// Assemble the stored fields for one message
    fn build_fields(&self, channel: &str, msg: &Message, options: &ImportOptions) -> PostFields {
        let title = self.build_title(msg);

        let body = if msg.title_text.is_empty() {
            msg.text_html.clone()
        } else {
            self.parser.remove_title(&msg.text_html, &msg.title_text)
        };

        let mut parts: Vec<&str> = Vec::new();
        if has_content(&body) {
            parts.push(&body);
        }
        if !msg.media_html.is_empty() {
            parts.push(&msg.media_html);
        }
        let content = parts.join("\n\n");

        let published_at = DateTime::parse_from_rfc3339(&msg.datetime)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));

        PostFields {
            title,
            content,
            status: options.status.clone(),
            author: options.author.clone(),
            category: options.category.clone(),
            published_at,
            channel: channel.to_string(),
            message_id: msg.id,
            link: msg.link.clone(),
        }
    }

    /// Title precedence: extracted bold title, then the message text as plain
    /// text, then a generic placeholder naming the message id
    fn build_title(&self, msg: &Message) -> String {
        let candidate = if !msg.title_text.is_empty() {
            msg.title_text.clone()
        } else {
            strip_html_tags(&msg.text_html)
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default()
                .to_string()
        };

        if candidate.is_empty() {
            default_title(msg.id)
        } else {
            truncate_chars(&candidate, TITLE_MAX_CHARS)
        }
    }
}

enum Outcome {
    Created,
    Updated,
    Skipped,
}
