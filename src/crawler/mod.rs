//! Channel crawling: URL construction, page fetching, and paginated
//! collection
//!
//! The crawl path is intentionally sequential: one preview page at a time,
//! cursor-driven, so the source ordering assumptions in the collector hold.

pub mod collector;
pub mod fetcher;
pub mod url;

pub use collector::{MessageCollector, PAGE_LIMIT};
pub use fetcher::{FetchPage, PageFetcher, DEFAULT_TIMEOUT};
pub use url::{normalize_channel, permalink, preview_url};
