//! Media normalization for message wrappers
//!
//! Photos, videos, and document attachments in the preview markup are
//! converted into a minimal HTML fragment (`img`/`video`/`a` wrapped in `p`),
//! newline-joined. URLs are validated before being embedded and all text is
//! escaped; a piece with a malformed or unsafe URL is dropped silently rather
//! than emitted.

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::parser::sanitize::strip_html_tags;

/// Label used for document links without any text content
const DEFAULT_DOCUMENT_LABEL: &str = "Download file";

static PHOTO_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.tgme_widget_message_photo_wrap").unwrap());

static VIDEO_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("video").unwrap());

static SOURCE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("source").unwrap());

static DOCUMENT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.tgme_widget_message_document").unwrap());

static STYLE_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"url\(["']?([^"')]+)["']?\)"#).unwrap());

static PHOTO_STYLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)tgme_widget_message_photo_wrap[^>]+style="[^"]*url\(["']?([^"')]+)["']?\)"#)
        .unwrap()
});

static VIDEO_SRC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<video[^>]+src="([^"]+)""#).unwrap());

static SOURCE_SRC_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<source[^>]+src="([^"]+)""#).unwrap());

static DOCUMENT_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<a[^>]+class="[^"]*tgme_widget_message_document[^"]*"[^>]+href="([^"]+)"[^>]*>(.*?)</a>"#,
    )
    .unwrap()
});

/// Describe the media of one message wrapper element as an HTML fragment
///
/// Scans the whole wrapper (not just the text element) for photo, video, and
/// document sub-elements. Returns an empty string when none are found.
#[must_use]
pub fn from_wrapper(wrap: ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    for photo in wrap.select(&PHOTO_SELECTOR) {
        let Some(style) = photo.value().attr("style") else {
            continue;
        };
        if let Some(piece) = STYLE_URL_REGEX
            .captures(style)
            .and_then(|caps| caps.get(1))
            .and_then(|m| image_tag(m.as_str()))
        {
            parts.push(piece);
        }
    }

    for video in wrap.select(&VIDEO_SELECTOR) {
        let src = video.value().attr("src").or_else(|| {
            video
                .select(&SOURCE_SELECTOR)
                .next()
                .and_then(|source| source.value().attr("src"))
        });
        if let Some(piece) = src.and_then(video_tag) {
            parts.push(piece);
        }
    }

    for document in wrap.select(&DOCUMENT_SELECTOR) {
        let Some(href) = document.value().attr("href") else {
            continue;
        };
        let label = document.text().collect::<String>().trim().to_string();
        if let Some(piece) = document_tag(href, &label) {
            parts.push(piece);
        }
    }

    parts.join("\n")
}

/// Describe the media of one raw wrapper chunk (regex fallback mode)
///
/// Same semantics as [`from_wrapper`] with best-effort accuracy on malformed
/// markup. `<video src>` matches and bare `<source>` elements are mutually
/// exclusive alternatives: when any video tag carries its own `src`, source
/// elements are not separately scanned.
#[must_use]
pub fn from_chunk(chunk: &str) -> String {
    let mut parts = Vec::new();

    for caps in PHOTO_STYLE_REGEX.captures_iter(chunk) {
        if let Some(piece) = caps.get(1).and_then(|m| image_tag(m.as_str())) {
            parts.push(piece);
        }
    }

    let video_matches: Vec<_> = VIDEO_SRC_REGEX.captures_iter(chunk).collect();
    if video_matches.is_empty() {
        for caps in SOURCE_SRC_REGEX.captures_iter(chunk) {
            if let Some(piece) = caps.get(1).and_then(|m| video_tag(m.as_str())) {
                parts.push(piece);
            }
        }
    } else {
        for caps in video_matches {
            if let Some(piece) = caps.get(1).and_then(|m| video_tag(m.as_str())) {
                parts.push(piece);
            }
        }
    }

    for caps in DOCUMENT_LINK_REGEX.captures_iter(chunk) {
        let href = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let label = strip_html_tags(caps.get(2).map(|m| m.as_str()).unwrap_or_default())
            .trim()
            .to_string();
        if let Some(piece) = document_tag(href, &label) {
            parts.push(piece);
        }
    }

    parts.join("\n")
}

/// Validate a URL for embedding, returning it trimmed when acceptable
///
/// Only absolute http/https URLs pass; everything else is rejected so
/// javascript:, data:, and relative references never reach stored content.
fn sanitize_url(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).ok()?;
    matches!(parsed.scheme(), "http" | "https").then_some(trimmed)
}

fn image_tag(raw_url: &str) -> Option<String> {
    let url = sanitize_url(raw_url)?;
    Some(format!(
        r#"<p><img src="{}" alt="" /></p>"#,
        html_escape::encode_double_quoted_attribute(url)
    ))
}

fn video_tag(raw_url: &str) -> Option<String> {
    let url = sanitize_url(raw_url)?;
    Some(format!(
        r#"<p><video controls src="{}"></video></p>"#,
        html_escape::encode_double_quoted_attribute(url)
    ))
}

fn document_tag(raw_url: &str, label: &str) -> Option<String> {
    let url = sanitize_url(raw_url)?;
    let label = if label.trim().is_empty() {
        DEFAULT_DOCUMENT_LABEL.to_string()
    } else {
        html_escape::encode_text(label.trim()).to_string()
    };
    Some(format!(
        r#"<p><a href="{}">{}</a></p>"#,
        html_escape::encode_double_quoted_attribute(url),
        label
    ))
}
