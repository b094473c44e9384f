//! Row types, column bounds, and text helpers for the result store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Schema / limits
// ---------------------------------------------------------------------------

pub(crate) const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Maximum length (in chars) of a stored query.
pub const MAX_QUERY_CHARS: usize = 256;
/// Maximum length (in chars) of a stored result URL.
pub const MAX_URL_CHARS: usize = 2048;
/// Titles longer than this are truncated on insert.
pub const MAX_TITLE_CHARS: usize = 512;
/// Display links longer than this are truncated on insert.
pub const MAX_DISPLAY_LINK_CHARS: usize = 256;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One persisted search result.
///
/// Rows for a query always come from a single fetch batch and share
/// `fetched_at_utc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResult {
    /// Store-assigned identity; never reused.
    pub id: i64,
    /// Trimmed search term.
    pub query: String,
    pub url: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub display_link: Option<String>,
    /// 1-based rank within the batch.
    pub position: u32,
    pub fetched_at_utc: DateTime<Utc>,
}

/// The live rows for an exactly matching cached query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit {
    /// The normalized query that matched.
    pub query: String,
    /// Rows ordered by position.
    pub rows: Vec<StoredResult>,
}

/// Per-query overview of what the store holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySummary {
    pub query: String,
    pub result_count: usize,
    pub fetched_at_utc: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Normalize a query for storage and lookup.
pub fn normalize_query(query: &str) -> &str {
    query.trim()
}

/// Truncate `text` to at most `max_chars` chars, never splitting a char.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_owned(),
        None => text.to_owned(),
    }
}

/// Case-fold `text` for substring matching.
///
/// Full Unicode lowercasing; the `fold_case` SQL function applies the same
/// mapping to stored columns.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}
