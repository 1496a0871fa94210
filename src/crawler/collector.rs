//! Paginated message collection with deduplication
//!
//! Drives repeated page fetches with a `before` cursor, deduplicates by
//! message id, enforces a maximum result count, and returns results in
//! chronological order. Source pages are newest-first, so the accumulator is
//! reversed on exit.

use std::collections::HashSet;

use crate::crawler::fetcher::FetchPage;
use crate::parser::{Message, MessageParser};
use crate::utils::error::FetchError;

/// Hard cap on page fetches per collection run
pub const PAGE_LIMIT: usize = 50;

/// Collects a channel's messages across preview pages
pub struct MessageCollector<F: FetchPage> {
    fetcher: F,
    parser: Box<dyn MessageParser>,
}

impl<F: FetchPage> MessageCollector<F> {
    /// Create a new collector from a page fetcher and a message parser
    pub fn new(fetcher: F, parser: Box<dyn MessageParser>) -> Self {
        Self { fetcher, parser }
    }

    /// Access the parser this collector extracts with
    #[must_use]
    pub fn parser(&self) -> &dyn MessageParser {
        self.parser.as_ref()
    }

    /// Collect up to `max_count` messages from a channel, oldest first
    ///
    /// `max_count == 0` means unbounded, limited only by the page cap. A
    /// fetch failure aborts the whole run; an empty page is the normal end of
    /// the stream, and an empty result is a valid outcome, not an error.
    ///
    /// # Errors
    ///
    /// Returns the `FetchError` of the first failed page; messages gathered
    /// before the failure are discarded.
    pub async fn collect(
        &self,
        channel: &str,
        max_count: usize,
    ) -> Result<Vec<Message>, FetchError> {
        let mut messages: Vec<Message> = Vec::new();
        let mut seen_ids: HashSet<u64> = HashSet::new();
        let mut before: Option<u64> = None;

        'pages: for page in 0..PAGE_LIMIT {
            let html = self.fetcher.fetch_page(channel, before).await?;
            let batch = self.parser.extract_all(&html, channel);

            if batch.is_empty() {
                tracing::debug!(page, "Empty page, stopping pagination");
                break;
            }

            // Advance the cursor from the page's last raw id even when that
            // message is skipped as a duplicate, or pagination could stall on
            // a page of nothing but overlap.
            let last_raw_id = batch.last().map(|msg| msg.id);

            for msg in batch {
                if msg.id == 0 || !seen_ids.insert(msg.id) {
                    continue;
                }
                messages.push(msg);
                if max_count > 0 && messages.len() >= max_count {
                    tracing::debug!(page, collected = messages.len(), "Reached max count");
                    break 'pages;
                }
            }

            before = last_raw_id;
        }

        // Pages arrive newest-first; output is oldest-first
        messages.reverse();

        tracing::info!(
            channel = %channel,
            collected = messages.len(),
            "Completed message collection"
        );

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::url::permalink;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fake fetcher returning scripted pages keyed by the `before` cursor
    struct ScriptedFetcher {
        pages: Vec<(Option<u64>, Result<String, FetchError>)>,
        calls: Mutex<usize>,
    }

    impl ScriptedFetcher {
        fn new(pages: Vec<(Option<u64>, Result<String, FetchError>)>) -> Self {
            Self {
                pages,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl FetchPage for ScriptedFetcher {
        async fn fetch_page(
            &self,
            _channel: &str,
            before: Option<u64>,
        ) -> Result<String, FetchError> {
            let mut calls = self.calls.lock().unwrap();
            let index = *calls;
            *calls += 1;

            let (expected_before, result) = self
                .pages
                .get(index)
                .unwrap_or_else(|| panic!("unexpected page fetch #{index}"));
            assert_eq!(*expected_before, before, "cursor mismatch on fetch #{index}");

            match result {
                Ok(html) => Ok(html.clone()),
                Err(FetchError::Timeout) => Err(FetchError::Timeout),
                Err(FetchError::EmptyBody) => Err(FetchError::EmptyBody),
                Err(FetchError::ServerError(code)) => Err(FetchError::ServerError(*code)),
                Err(FetchError::Http(_)) => unreachable!("Http errors not scripted"),
            }
        }
    }

    /// Fake parser mapping scripted page payloads (comma-separated ids) to
    /// messages, newest-first like the real preview pages
    struct IdListParser;

    impl MessageParser for IdListParser {
        fn extract_all(&self, html: &str, channel: &str) -> Vec<Message> {
            html.split(',')
                .filter(|part| !part.trim().is_empty())
                .filter_map(|part| part.trim().parse::<u64>().ok())
                .map(|id| Message {
                    id,
                    link: permalink(channel, id),
                    text_html: format!("body {id}"),
                    title_text: String::new(),
                    media_html: String::new(),
                    datetime: String::new(),
                })
                .collect()
        }

        fn remove_title(&self, text_html: &str, _title_text: &str) -> String {
            text_html.to_string()
        }
    }

    fn collector(
        pages: Vec<(Option<u64>, Result<String, FetchError>)>,
    ) -> MessageCollector<ScriptedFetcher> {
        MessageCollector::new(ScriptedFetcher::new(pages), Box::new(IdListParser))
    }

    #[tokio::test]
    async fn test_single_page_reversed_to_oldest_first() {
        let collector = collector(vec![
            (None, Ok("50,49,48".to_string())),
            (Some(48), Ok(String::new())),
        ]);

        let messages = collector.collect("chan", 0).await.unwrap();
        let ids: Vec<u64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![48, 49, 50]);
    }

    #[tokio::test]
    async fn test_two_pages_with_overlap_deduped() {
        let collector = collector(vec![
            (None, Ok("50,49,48".to_string())),
            (Some(48), Ok("48,47".to_string())),
            (Some(47), Ok(String::new())),
        ]);

        let messages = collector.collect("chan", 0).await.unwrap();
        let ids: Vec<u64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![47, 48, 49, 50]);
    }

    #[tokio::test]
    async fn test_max_count_stops_mid_page() {
        let collector = collector(vec![(None, Ok("50,49,48,47".to_string()))]);

        let messages = collector.collect("chan", 2).await.unwrap();
        let ids: Vec<u64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![49, 50]);
    }

    #[tokio::test]
    async fn test_max_count_across_pages_exact() {
        let collector = collector(vec![
            (None, Ok("50,49".to_string())),
            (Some(49), Ok("48,47".to_string())),
        ]);

        let messages = collector.collect("chan", 3).await.unwrap();
        assert_eq!(messages.len(), 3);
        let ids: Vec<u64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![48, 49, 50]);
    }

    #[tokio::test]
    async fn test_duplicate_only_page_still_advances_cursor() {
        // Page two repeats page one entirely; the cursor must still move to
        // the page's last raw id so page three can end the run.
        let collector = collector(vec![
            (None, Ok("10,9".to_string())),
            (Some(9), Ok("10,9".to_string())),
            (Some(9), Ok(String::new())),
        ]);

        let messages = collector.collect("chan", 0).await.unwrap();
        let ids: Vec<u64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![9, 10]);
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_whole_run() {
        let collector = collector(vec![
            (None, Ok("50,49".to_string())),
            (Some(49), Err(FetchError::ServerError(502))),
        ]);

        let result = collector.collect("chan", 0).await;
        assert!(matches!(result, Err(FetchError::ServerError(502))));
    }

    #[tokio::test]
    async fn test_timeout_is_a_fetch_failure() {
        let collector = collector(vec![(None, Err(FetchError::Timeout))]);
        assert!(matches!(collector.collect("chan", 0).await, Err(FetchError::Timeout)));
    }

    #[tokio::test]
    async fn test_empty_channel_is_not_an_error() {
        let collector = collector(vec![(None, Ok(String::new()))]);
        let messages = collector.collect("chan", 0).await.unwrap();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_page_cap_bounds_unbounded_runs() {
        // Every page returns one fresh id; the hard cap must end the run
        let mut pages = Vec::new();
        let mut before = None;
        for i in 0..PAGE_LIMIT {
            let id = 1000 - i as u64;
            pages.push((before, Ok(id.to_string())));
            before = Some(id);
        }

        let collector = collector(pages);
        let messages = collector.collect("chan", 0).await.unwrap();
        assert_eq!(messages.len(), PAGE_LIMIT);
    }

    #[tokio::test]
    async fn test_no_duplicates_or_zero_ids_in_output() {
        let collector = collector(vec![
            (None, Ok("5,0,5,4".to_string())),
            (Some(4), Ok(String::new())),
        ]);

        let messages = collector.collect("chan", 0).await.unwrap();
        let ids: Vec<u64> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![4, 5]);
    }
}
