//! Error types for the telepost importer
//!
//! This module defines custom error types used throughout the application.

use thiserror::Error;

/// Errors that can occur while fetching a channel preview page
///
/// Any of these aborts the whole collection run; no partial results
/// are returned past a failed page.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server responded with a non-success status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Response body was empty
    #[error("Empty response body")]
    EmptyBody,
}

/// Errors that can occur while setting up HTML parsing
///
/// A selector that fails to compile triggers the regex fallback parser
/// instead of surfacing to the caller.
#[derive(Error, Debug)]
pub enum ParseError {
    /// CSS selector failed to compile
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Errors surfaced by the import workflow
#[derive(Error, Debug)]
pub enum ImportError {
    /// Fetch error while collecting messages
    #[error("Failed to fetch Telegram channel: {0}")]
    Fetch(#[from] FetchError),

    /// No channel configured
    #[error("Missing channel username")]
    MissingChannel,

    /// Review snapshot is missing or past its TTL
    #[error("Preview expired. Fetch messages again")]
    PreviewExpired,

    /// Selection did not match any cached message
    #[error("No matching messages found")]
    NoSelection,
}
