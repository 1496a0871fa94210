//! CLI command implementations

pub mod import;
pub mod preview;

use crate::config::Config;
use crate::crawler::{MessageCollector, PageFetcher};
use crate::parser::select_parser;
use crate::utils::error::FetchError;

/// Default actor key for review snapshots when none is given
pub const DEFAULT_ACTOR: &str = "local";

/// Build a collector wired up from configuration
pub(crate) fn build_collector(config: &Config) -> Result<MessageCollector<PageFetcher>, FetchError> {
    let fetcher = PageFetcher::with_config(
        config.request_timeout(),
        config.fetch.rate_limit,
        &config.fetch.user_agent,
    )?;
    Ok(MessageCollector::new(fetcher, select_parser()))
}
