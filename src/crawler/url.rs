//! Channel handle normalization and t.me URL building
//!
//! Telegram channels are addressed by a bare handle. Users paste them in
//! several shapes (`@handle`, `https://t.me/handle`, plain `handle`), and the
//! same handle must map to the same lookup key, fetch path, and stored key
//! everywhere, so normalization lives in one place.

use regex::Regex;
use std::sync::LazyLock;

static TME_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://t\.me/").unwrap());

/// Normalize a channel handle
///
/// Strips surrounding whitespace, a leading `https://t.me/` (or `http://`)
/// prefix, and a leading `@`.
///
/// # Examples
///
/// ```
/// use telepost::crawler::url::normalize_channel;
///
/// assert_eq!(normalize_channel("https://t.me/samplechannel"), "samplechannel");
/// assert_eq!(normalize_channel("@samplechannel"), "samplechannel");
/// assert_eq!(normalize_channel("  samplechannel "), "samplechannel");
/// ```
#[must_use]
pub fn normalize_channel(channel: &str) -> String {
    let trimmed = channel.trim();
    let stripped = TME_PREFIX.replace(trimmed, "");
    stripped.trim_start_matches('@').to_string()
}

/// Build the path-and-query part of a preview page request
///
/// Format: `/s/{channel}` with an optional `?before={id}` cursor requesting
/// messages strictly older than the given message id.
///
/// # Examples
///
/// ```
/// use telepost::crawler::url::preview_path;
///
/// assert_eq!(preview_path("chan", None), "/s/chan");
/// assert_eq!(preview_path("chan", Some(48)), "/s/chan?before=48");
/// ```
#[must_use]
pub fn preview_path(channel: &str, before: Option<u64>) -> String {
    match before {
        Some(id) => format!("/s/{channel}?before={id}"),
        None => format!("/s/{channel}"),
    }
}

/// Build the full preview page URL for one page of a channel's message list
///
/// Format: `https://t.me/s/{channel}` with optional `?before={id}`.
#[must_use]
pub fn preview_url(channel: &str, before: Option<u64>) -> String {
    format!("https://t.me{}", preview_path(channel, before))
}

/// Build the canonical permalink for a single message
///
/// Format: `https://t.me/{channel}/{id}`.
///
/// # Examples
///
/// ```
/// use telepost::crawler::url::permalink;
///
/// assert_eq!(permalink("chan", 42), "https://t.me/chan/42");
/// ```
#[must_use]
pub fn permalink(channel: &str, id: u64) -> String {
    format!("https://t.me/{channel}/{id}")
}
