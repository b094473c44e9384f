//! Error types for sister-search.

use crate::results::ResultStoreError;

/// Top-level error type for the search-and-cache flow.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fetching from the upstream search API failed.
    #[error("search error: {0}")]
    Search(#[from] web_search::SearchError),

    /// Reading or writing the result store failed.
    #[error("store error: {0}")]
    Store(#[from] ResultStoreError),

    /// The caller passed an unusable argument, such as a blank query.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, Error>;
