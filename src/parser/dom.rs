//! Tree-based message extraction using CSS-class selectors
//!
//! This is the primary extractor. Class matching is done on
//! whitespace-delimited tokens (CSS class semantics), not substrings.

use scraper::{Html, Selector};

use crate::crawler::url::permalink;
use crate::parser::media;
use crate::parser::sanitize::strip_emoji_backgrounds;
use crate::parser::title;
use crate::parser::{Message, MessageParser};
use crate::utils::error::ParseError;

/// Message extractor backed by a full HTML tree parser
pub struct DomParser {
    wrap_selector: Selector,
    message_selector: Selector,
    text_selector: Selector,
    time_selector: Selector,
}

impl DomParser {
    /// Create a new tree-based parser
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Selector` if any of the hardcoded selectors fails
    /// to compile; the caller falls back to the regex extractor in that case.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            wrap_selector: parse_selector("div.tgme_widget_message_wrap")?,
            message_selector: parse_selector("div.tgme_widget_message")?,
            text_selector: parse_selector("div.tgme_widget_message_text")?,
            time_selector: parse_selector("time")?,
        })
    }

    fn extract_messages(&self, html: &str, channel: &str) -> Vec<Message> {
        let document = Html::parse_document(html);
        let mut messages = Vec::new();

        for wrap in document.select(&self.wrap_selector) {
            let Some(message_el) = wrap.select(&self.message_selector).next() else {
                continue;
            };
            let Some(data_post) = message_el.value().attr("data-post") else {
                continue;
            };

            // data-post is "{channel_path}/{id}"
            let Some(id) = data_post
                .split('/')
                .nth(1)
                .and_then(|part| part.parse::<u64>().ok())
                .filter(|id| *id > 0)
            else {
                continue;
            };

            let text_html = wrap
                .select(&self.text_selector)
                .next()
                .map(|el| el.inner_html())
                .unwrap_or_default();
            let text_html = strip_emoji_backgrounds(&text_html);
            let title_text = title::extract_title(&text_html);
            let media_html = media::from_wrapper(wrap);

            let datetime = wrap
                .select(&self.time_selector)
                .next()
                .and_then(|el| el.value().attr("datetime"))
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

impl MessageParser for DomParser {
    fn extract_all(&self, html: &str, channel: &str) -> Vec<Message> {
        self.extract_messages(html, channel)
    }

    fn remove_title(&self, text_html: &str, title_text: &str) -> String {
        title::remove_title(text_html, title_text)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ParseError> {
    Selector::parse(selector).map_err(|e| ParseError::Selector(format!("{selector}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::fixtures::{page_with, wrapper_html};

    #[test]
    fn test_parser_creation() {
        assert!(DomParser::new().is_ok());
    }

    #[test]
    fn test_extract_single_message() {
        let parser = DomParser::new().unwrap();
        let html = page_with(&[wrapper_html(
            "chan/42",
            "<strong>Hello</strong><br>World",
            "2023-01-01T00:00:00+00:00",
        )]);

        let messages = parser.extract_all(&html, "chan");
        assert_eq!(messages.len(), 1);

        let msg = &messages[0];
        assert_eq!(msg.id, 42);
        assert_eq!(msg.link, "https://t.me/chan/42");
        assert_eq!(msg.title_text, "Hello");
        assert_eq!(msg.datetime, "2023-01-01T00:00:00+00:00");
        assert_eq!(parser.remove_title(&msg.text_html, &msg.title_text), "World");
    }

    #[test]
    fn test_skip_wrapper_without_data_post() {
        let parser = DomParser::new().unwrap();
        let html = page_with(&[
            r#"<div class="tgme_widget_message_wrap"><div class="tgme_widget_message">no id</div></div>"#.to_string(),
            wrapper_html("chan/7", "text", ""),
        ]);

        let messages = parser.extract_all(&html, "chan");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, 7);
    }

    #[test]
    fn test_skip_non_positive_id() {
        let parser = DomParser::new().unwrap();
        let html = page_with(&[
            wrapper_html("chan/0", "zero", ""),
            wrapper_html("chan/abc", "garbage", ""),
            wrapper_html("chan/5", "ok", ""),
        ]);

        let messages = parser.extract_all(&html, "chan");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].id, 5);
    }

    #[test]
    fn test_missing_text_element_is_empty() {
        let parser = DomParser::new().unwrap();
        let html = page_with(&[
            r#"<div class="tgme_widget_message_wrap"><div class="tgme_widget_message" data-post="chan/3"><time datetime="2024-05-05T10:00:00+00:00"></time></div></div>"#.to_string(),
        ]);

        let messages = parser.extract_all(&html, "chan");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text_html, "");
        assert_eq!(messages[0].title_text, "");
    }

    #[test]
    fn test_class_token_matching() {
        let parser = DomParser::new().unwrap();
        // Extra class tokens on the wrapper must still match
        let html = page_with(&[wrapper_html("chan/9", "body", "").replace(
            r#"class="tgme_widget_message_wrap""#,
            r#"class="tgme_widget_message_wrap js-widget_message_wrap date_visible""#,
        )]);

        let messages = parser.extract_all(&html, "chan");
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_media_scanned_from_whole_wrapper() {
        let parser = DomParser::new().unwrap();
        let wrapper = r#"<div class="tgme_widget_message_wrap"><div class="tgme_widget_message" data-post="chan/11"><a class="tgme_widget_message_photo_wrap" style="background-image:url('https://x/y.jpg')"></a><div class="tgme_widget_message_text">caption</div></div></div>"#.to_string();
        let html = page_with(&[wrapper]);

        let messages = parser.extract_all(&html, "chan");
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].media_html,
            r#"<p><img src="https://x/y.jpg" alt="" /></p>"#
        );
    }

    #[test]
    fn test_emoji_styles_stripped_from_text() {
        let parser = DomParser::new().unwrap();
        let body = r#"<i class="emoji" style="background-image:url('//telegram.org/img/emoji/40/X.png')"><b>🎉</b></i> news"#;
        let html = page_with(&[wrapper_html("chan/12", body, "")]);

        let messages = parser.extract_all(&html, "chan");
        assert_eq!(messages.len(), 1);
        assert!(!messages[0].text_html.contains("telegram.org/img/emoji"));
        assert!(messages[0].text_html.contains("🎉"));
    }

    #[test]
    fn test_empty_page_yields_no_messages() {
        let parser = DomParser::new().unwrap();
        let messages = parser.extract_all("<html><body>nothing here</body></html>", "chan");
        assert!(messages.is_empty());
    }
}
