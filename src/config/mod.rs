//! Configuration management for the telepost importer
//!
//! This module handles loading and validating configuration from environment
//! variables, files, and command-line arguments.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fetch configuration
    pub fetch: FetchConfig,

    /// Import configuration
    pub import: ImportConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Fetch-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Rate limit (page requests per second)
    pub rate_limit: u32,

    /// User agent string
    pub user_agent: String,
}

/// Import-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Default channel to import from
    pub channel: String,

    /// Status assigned to imported posts
    pub post_status: String,

    /// Author assigned to imported posts (optional)
    pub author: Option<String>,

    /// Category assigned to imported posts (optional)
    pub category: Option<String>,

    /// Maximum messages fetched per run (0 = unbounded)
    pub max_per_run: usize,

    /// Update existing posts instead of skipping them
    pub overwrite_existing: bool,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory imported posts are written to
    pub posts_dir: PathBuf,

    /// Directory review snapshots are written to
    pub review_dir: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let request_timeout_secs = std::env::var("TELEPOST_REQUEST_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(20);

        let rate_limit = std::env::var("TELEPOST_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);

        let user_agent = std::env::var("TELEPOST_USER_AGENT")
            .unwrap_or_else(|_| format!("telepost/{}", env!("CARGO_PKG_VERSION")));

        let channel = std::env::var("TELEPOST_CHANNEL").unwrap_or_default();

        let post_status =
            std::env::var("TELEPOST_POST_STATUS").unwrap_or_else(|_| String::from("draft"));

        let author = std::env::var("TELEPOST_AUTHOR").ok();
        let category = std::env::var("TELEPOST_CATEGORY").ok();

        let max_per_run = std::env::var("TELEPOST_MAX_PER_RUN")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(50);

        let overwrite_existing = std::env::var("TELEPOST_OVERWRITE")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let posts_dir = std::env::var("TELEPOST_POSTS_DIR")
            .unwrap_or_else(|_| String::from("data/posts"))
            .into();

        let review_dir = std::env::var("TELEPOST_REVIEW_DIR")
            .unwrap_or_else(|_| String::from("data/review"))
            .into();

        let log_level =
            std::env::var("TELEPOST_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("TELEPOST_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            fetch: FetchConfig {
                request_timeout_secs,
                rate_limit,
                user_agent,
            },
            import: ImportConfig {
                channel,
                post_status,
                author,
                category,
                max_per_run,
                overwrite_existing,
            },
            storage: StorageConfig {
                posts_dir,
                review_dir,
            },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.fetch.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.fetch.rate_limit == 0 {
            anyhow::bail!("rate_limit must be greater than 0");
        }

        if self.import.post_status.trim().is_empty() {
            anyhow::bail!("post_status must not be empty");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig {
                request_timeout_secs: 20,
                rate_limit: 1,
                user_agent: format!("telepost/{}", env!("CARGO_PKG_VERSION")),
            },
            import: ImportConfig {
                channel: String::new(),
                post_status: String::from("draft"),
                author: None,
                category: None,
                max_per_run: 50,
                overwrite_existing: false,
            },
            storage: StorageConfig {
                posts_dir: PathBuf::from("data/posts"),
                review_dir: PathBuf::from("data/review"),
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
