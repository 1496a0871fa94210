//! Regex-based message extraction
//!
//! Substituted transparently when the tree parser is unavailable. Operates on
//! raw text chunks split on the message-wrapper boundary and mirrors the tree
//! extractor's field semantics with best-effort accuracy; deeply nested or
//! malformed markup may be missed, which is accepted degradation rather than
//! an error.

use regex::Regex;
use std::sync::LazyLock;

use crate::crawler::url::permalink;
use crate::parser::media;
use crate::parser::sanitize::strip_emoji_backgrounds;
use crate::parser::title;
use crate::parser::{Message, MessageParser};

static WRAP_BOUNDARY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<div class="tgme_widget_message_wrap[^"]*">"#).unwrap());

static DATA_POST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)data-post="([^"]+)""#).unwrap());

static TEXT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<div class="tgme_widget_message_text[^"]*">(.*?)</div>"#).unwrap()
});

static DATETIME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<time[^>]+datetime="([^"]+)""#).unwrap());

/// Message extractor working on raw text without a tree parser
#[derive(Default)]
pub struct RegexParser;

impl RegexParser {
    /// Create a new regex-based parser
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn extract_messages(&self, html: &str, channel: &str) -> Vec<Message> {
        let mut messages = Vec::new();

        // Everything before the first wrapper boundary is page chrome
        let mut chunks = WRAP_BOUNDARY_REGEX.split(html);
        chunks.next();

        for chunk in chunks {
            let Some(id) = DATA_POST_REGEX
                .captures(chunk)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().split('/').nth(1))
                .and_then(|part| part.parse::<u64>().ok())
                .filter(|id| *id > 0)
            else {
                continue;
            };

            let text_html = TEXT_REGEX
                .captures(chunk)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .unwrap_or_default();
            let text_html = strip_emoji_backgrounds(text_html);
            let title_text = title::extract_title(&text_html);
            let media_html = media::from_chunk(chunk);

            let datetime = DATETIME_REGEX
                .captures(chunk)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .unwrap_or_default()
                .to_string();

            messages.push(Message {
                id,
                link: permalink(channel, id),
                text_html,
                title_text,
                media_html,
                datetime,
            });
        }

        messages
    }
}

impl MessageParser for RegexParser {
    fn extract_all(&self, html: &str, channel: &str) -> Vec<Message> {
        self.extract_messages(html, channel)
    }

    fn remove_title(&self, text_html: &str, title_text: &str) -> String {
        title::remove_title_lossy(text_html, title_text)
    }
}
