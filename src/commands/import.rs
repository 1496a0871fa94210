//! Import command: persist fetched messages as posts

use anyhow::Result;

use crate::cache::{FileReviewStore, ReviewStore};
use crate::commands::build_collector;
use crate::config::Config;
use crate::crawler::url::normalize_channel;
use crate::importer::{ImportOptions, Importer};
use crate::parser::{select_parser, Message};
use crate::storage::JsonStore;
use crate::utils::error::ImportError;

pub async fn import(
    config: Config,
    channel: Option<String>,
    max_count: Option<usize>,
    ids: Option<Vec<u64>>,
    overwrite: bool,
    actor: &str,
) -> Result<()> {
    let channel = normalize_channel(channel.as_deref().unwrap_or(&config.import.channel));
    if channel.is_empty() {
        return Err(ImportError::MissingChannel.into());
    }

    let messages = match &ids {
        // Selection acts on the previously reviewed list, never a fresh fetch
        Some(selected) => from_snapshot(&config, &channel, selected, actor).await?,
        None => {
            let max_count = max_count.unwrap_or(config.import.max_per_run);
            let collector = build_collector(&config)?;
            collector
                .collect(&channel, max_count)
                .await
                .map_err(ImportError::Fetch)?
        }
    };

    if messages.is_empty() {
        println!("No messages found.");
        return Ok(());
    }

    let options = ImportOptions {
        status: config.import.post_status.clone(),
        author: config.import.author.clone(),
        category: config.import.category.clone(),
        overwrite_existing: overwrite || config.import.overwrite_existing,
    };

    let store = JsonStore::new(&config.storage.posts_dir);
    let parser = select_parser();
    let importer = Importer::new(&store, parser.as_ref());

    let summary = importer.import_batch(&channel, &messages, &options).await;

    println!("{}", summary.outcome(options.overwrite_existing));
    if summary.failed > 0 {
        println!("{} messages failed to import; see the log for details.", summary.failed);
    }

    Ok(())
}

/// Resolve an id selection against the actor's saved preview
async fn from_snapshot(
    config: &Config,
    channel: &str,
    selected: &[u64],
    actor: &str,
) -> Result<Vec<Message>> {
    let review_store = FileReviewStore::new(&config.storage.review_dir);
    let snapshot = review_store
        .get(actor)
        .await?
        .filter(|snap| snap.channel == channel)
        .ok_or(ImportError::PreviewExpired)?;

    let messages: Vec<Message> = snapshot
        .messages
        .into_iter()
        .filter(|msg| selected.contains(&msg.id))
        .collect();

    if messages.is_empty() {
        return Err(ImportError::NoSelection.into());
    }

    Ok(messages)
}
