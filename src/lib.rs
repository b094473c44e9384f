//! sister-search: fetch ranked web search results and keep them per query.
//!
//! Results come from the Google Custom Search JSON API or SerpApi through
//! the [`web_search`] crate and are persisted in a SQLite store.
//!
//! # Architecture
//!
//! - **Fetch**: [`web_search::SearchFetcher`] walks up to ten pages,
//!   deduplicates links and numbers results `1..=N`
//! - **Store**: [`results::ResultCache`] keeps the latest batch per query and
//!   swaps batches transactionally
//! - **Flow**: [`search::SearchService`] serves cached rows or fetches and
//!   stores new ones
//! - **Suggestions**: [`similarity`] ranks stored queries against typed input

pub mod app_dirs;
pub mod config;
pub mod error;
pub mod results;
pub mod search;
pub mod similarity;

pub use config::{AppConfig, StoreConfig};
pub use error::{Error, Result};
pub use results::{CacheHit, QuerySummary, ResultCache, ResultStoreError, StoredResult};
pub use search::{ResultSource, SearchOptions, SearchOutcome, SearchService};
pub use similarity::{MatchTier, match_tier};
