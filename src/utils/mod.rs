//! Common utilities and helpers

pub mod error;

pub use error::{FetchError, ImportError, ParseError};
