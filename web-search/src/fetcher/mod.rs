//! Paginating fetcher: page windows, dedup, positions.
//!
//! This module walks a provider's pages in fixed windows, deduplicates
//! results by link and numbers them in arrival order. The loop is written
//! once and shared by every [`crate::provider::SearchProvider`].

pub mod dedup;
pub mod pagination;
pub mod search;

pub use search::SearchFetcher;
