//! Cleanup helpers for extracted message fragments
//!
//! Emoji markup stripping, tag stripping, and code-point-safe truncation for
//! titles and excerpts.

use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

// Matches a style attribute on an emoji <i> element that points at the
// telegram.org sprite sheet. The regex crate has no backreferences, so the
// two quote styles are spelled out as alternatives.
static EMOJI_STYLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(<i\b[^>]*class="[^"]*\bemoji\b[^"]*"[^>]*?)\s+style=(?:"[^"]*telegram\.org/img/emoji[^"]*"|'[^']*telegram\.org/img/emoji[^']*')([^>]*>)"#,
    )
    .unwrap()
});

static BR_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

/// Remove sprite-sheet background styles from emoji markup
///
/// The preview markup renders emoji as `<i class="emoji" style="...">` with a
/// `background-image` pointing at telegram.org. Imported content keeps the
/// emoji text but drops the style attribute so nothing references the sprite
/// sheet.
///
/// # Examples
///
/// ```
/// use telepost::parser::sanitize::strip_emoji_backgrounds;
///
/// let html = r#"<i class="emoji" style="background-image:url('//telegram.org/img/emoji/40/X.png')"><b>🎉</b></i>"#;
/// assert_eq!(strip_emoji_backgrounds(html), r#"<i class="emoji"><b>🎉</b></i>"#);
/// ```
#[must_use]
pub fn strip_emoji_backgrounds(text_html: &str) -> String {
    if text_html.is_empty() {
        return String::new();
    }
    EMOJI_STYLE_REGEX.replace_all(text_html, "$1$2").to_string()
}

/// Extract plain text from HTML, removing all tags and decoding entities
///
/// Line breaks become newlines so the first-line title fallback has
/// something to split on.
///
/// # Examples
///
/// ```
/// use telepost::parser::sanitize::strip_html_tags;
///
/// assert_eq!(strip_html_tags("<strong>Hello</strong><br>World"), "Hello\nWorld");
/// ```
#[must_use]
pub fn strip_html_tags(html: &str) -> String {
    let with_newlines = BR_REGEX.replace_all(html, "\n");
    let detagged = TAG_REGEX.replace_all(&with_newlines, "");
    html_escape::decode_html_entities(detagged.as_ref()).to_string()
}

/// Truncate text to a maximum number of code points
///
/// Never splits a multi-byte character. Titles are capped at 80 code points,
/// preview titles at 120, excerpts at 140.
///
/// # Examples
///
/// ```
/// use telepost::parser::sanitize::truncate_chars;
///
/// assert_eq!(truncate_chars("Hello World", 5), "Hello");
/// assert_eq!(truncate_chars("Hello", 80), "Hello");
/// ```
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

/// Check if text contains meaningful content
///
/// Returns false if text is empty or only whitespace.
#[must_use]
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_emoji_backgrounds_double_quoted() {
        let html = r#"<i class="emoji" style="background-image:url('//telegram.org/img/emoji/40/F09F8E89.png')"><b>🎉</b></i> party"#;
        let clean = strip_emoji_backgrounds(html);
        assert_eq!(clean, r#"<i class="emoji"><b>🎉</b></i> party"#);
    }

    #[test]
    fn test_strip_emoji_backgrounds_single_quoted_attr() {
        let html = r#"<i class="emoji" style='background-image:url("//telegram.org/img/emoji/40/X.png")'>🎉</i>"#;
        let clean = strip_emoji_backgrounds(html);
        assert_eq!(clean, r#"<i class="emoji">🎉</i>"#);
    }

    #[test]
    fn test_strip_emoji_backgrounds_leaves_other_styles() {
        let html = r#"<i class="emoji" style="color:red">🎉</i>"#;
        assert_eq!(strip_emoji_backgrounds(html), html);
    }

    #[test]
    fn test_strip_emoji_backgrounds_leaves_non_emoji() {
        let html = r#"<i class="icon" style="background-image:url('//telegram.org/img/emoji/40/X.png')">x</i>"#;
        assert_eq!(strip_emoji_backgrounds(html), html);
    }

    #[test]
    fn test_strip_emoji_backgrounds_empty() {
        assert_eq!(strip_emoji_backgrounds(""), "");
    }

    #[test]
    fn test_strip_html_tags_basic() {
        assert_eq!(strip_html_tags("<p>Hello <em>World</em></p>"), "Hello World");
    }

    #[test]
    fn test_strip_html_tags_br_to_newline() {
        assert_eq!(strip_html_tags("Line 1<br>Line 2<br/>Line 3"), "Line 1\nLine 2\nLine 3");
    }

    #[test]
    fn test_strip_html_tags_decodes_entities() {
        assert_eq!(strip_html_tags("Fish &amp; Chips"), "Fish & Chips");
    }

    #[test]
    fn test_truncate_chars_short_input() {
        assert_eq!(truncate_chars("Hello", 80), "Hello");
    }

    #[test]
    fn test_truncate_chars_exact_boundary() {
        assert_eq!(truncate_chars("12345", 5), "12345");
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        // Each code point is multi-byte; must not split one
        let text = "привет мир";
        let truncated = truncate_chars(text, 6);
        assert_eq!(truncated, "привет");
    }

    #[test]
    fn test_truncate_chars_emoji() {
        let text = "🎉🎉🎉🎉";
        assert_eq!(truncate_chars(text, 2), "🎉🎉");
    }

    #[test]
    fn test_has_content() {
        assert!(has_content("Hello"));
        assert!(!has_content(""));
        assert!(!has_content("   \n\t  "));
    }
}
