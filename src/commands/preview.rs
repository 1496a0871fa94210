//! Preview command: fetch a channel and show what an import would take

use anyhow::{Context, Result};

use crate::cache::{FileReviewStore, ReviewSnapshot, ReviewStore};
use crate::commands::build_collector;
use crate::config::Config;
use crate::crawler::url::normalize_channel;
use crate::importer::ContentStore;
use crate::parser::sanitize::{strip_html_tags, truncate_chars};
use crate::parser::Message;
use crate::storage::JsonStore;
use crate::utils::error::ImportError;

/// Title column width in characters
const TITLE_CHARS: usize = 120;

/// Excerpt column width in characters
const EXCERPT_CHARS: usize = 140;

pub async fn preview(
    config: Config,
    channel: Option<String>,
    max_count: Option<usize>,
    actor: &str,
) -> Result<()> {
    let channel = normalize_channel(channel.as_deref().unwrap_or(&config.import.channel));
    if channel.is_empty() {
        return Err(ImportError::MissingChannel.into());
    }

    let max_count = max_count.unwrap_or(config.import.max_per_run);

    let collector = build_collector(&config)?;
    let messages = collector
        .collect(&channel, max_count)
        .await
        .map_err(ImportError::Fetch)?;

    if messages.is_empty() {
        println!("No messages found.");
        return Ok(());
    }

    let review_store = FileReviewStore::new(&config.storage.review_dir);
    review_store
        .put(actor, ReviewSnapshot::new(&channel, messages.clone()))
        .await
        .context("Failed to save review snapshot")?;

    let post_store = JsonStore::new(&config.storage.posts_dir);

    println!("Messages from @{channel}");
    println!("========================");

    // Collection order is oldest-first; review reads best newest-first
    let mut rows: Vec<&Message> = messages.iter().collect();
    rows.sort_by_key(|msg| std::cmp::Reverse(sort_key(msg)));

    for msg in rows {
        let imported = post_store
            .find_existing(&channel, msg.id)
            .await?
            .is_some();
        println!("{}", preview_line(msg, imported));
    }

    println!();
    println!(
        "Fetched {} messages from @{channel}. Run the import command within 10 minutes to act on this list.",
        messages.len()
    );

    Ok(())
}

/// Sort key for the review table: publication time, message id as tiebreak
///
/// An absent or unparsable datetime sorts as the epoch, pushing the message
/// to the bottom of the newest-first listing apart from its id.
fn sort_key(msg: &Message) -> (i64, u64) {
    let timestamp = chrono::DateTime::parse_from_rfc3339(&msg.datetime)
        .map(|dt| dt.timestamp())
        .unwrap_or(0);
    (timestamp, msg.id)
}

/// One review row: id, imported marker, title, date, and a plain-text excerpt
fn preview_line(msg: &Message, imported: bool) -> String {
    let marker = if imported { "*" } else { " " };

    let title = if msg.title_text.is_empty() {
        "(no title)".to_string()
    } else {
        truncate_chars(&msg.title_text, TITLE_CHARS)
    };

    let excerpt = truncate_chars(
        strip_html_tags(&msg.text_html).replace('\n', " ").trim(),
        EXCERPT_CHARS,
    );

    let date = if msg.datetime.is_empty() {
        "unknown date"
    } else {
        &msg.datetime
    };

    format!("{marker} #{:<8} {title}  [{date}]\n    {excerpt}", msg.id)
}
