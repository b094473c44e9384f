//! Persistent per-query search result cache.
//!
//! - [`types`]: row types, column bounds, text helpers
//! - [`schema`]: SQLite DDL and schema version tracking
//! - [`sqlite`]: [`ResultCache`], the transactional store

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::{ResultCache, ResultStoreError, validate_query};
pub use types::{
    CacheHit, MAX_DISPLAY_LINK_CHARS, MAX_QUERY_CHARS, MAX_TITLE_CHARS, MAX_URL_CHARS,
    QuerySummary, StoredResult, normalize_query,
};
