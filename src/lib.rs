//! telepost - Telegram channel post importer
//!
//! Fetches a public Telegram channel's web preview (`t.me/s/{channel}`),
//! extracts its messages, and imports them as draft posts with dedupe on
//! re-runs. No Telegram API credentials are involved; the public preview is
//! the only source.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Preview-page fetching and paginated collection
//! - [`parser`] - HTML parsing and message extraction
//! - [`importer`] - Message-to-post conversion with the upsert gate
//! - [`cache`] - Short-lived review snapshots between preview and import
//! - [`storage`] - Post storage backends
//! - [`commands`] - CLI command implementations
//! - [`utils`] - Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use telepost::config::Config;
//! use telepost::crawler::{MessageCollector, PageFetcher};
//! use telepost::parser::select_parser;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let fetcher = PageFetcher::with_config(
//!         config.request_timeout(),
//!         config.fetch.rate_limit,
//!         &config.fetch.user_agent,
//!     )?;
//!     let collector = MessageCollector::new(fetcher, select_parser());
//!     let messages = collector.collect("durov", 10).await?;
//!     println!("fetched {} messages", messages.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod commands;
pub mod config;
pub mod crawler;
pub mod importer;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::cache::{ReviewSnapshot, ReviewStore};
    pub use crate::config::Config;
    pub use crate::crawler::{FetchPage, MessageCollector, PageFetcher};
    pub use crate::importer::{ContentStore, ImportOptions, ImportSummary, Importer, PostFields};
    pub use crate::parser::{select_parser, Message, MessageParser};
    pub use crate::storage::JsonStore;
    pub use crate::utils::error::{FetchError, ImportError, ParseError};
}

// Direct re-exports for convenience
pub use parser::Message;
