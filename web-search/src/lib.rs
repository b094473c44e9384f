//! # web-search
//!
//! Paginated client for the Google Custom Search JSON API and SerpApi.
//!
//! ## Design
//!
//! - One fetch loop ([`SearchFetcher`]) shared by every provider
//! - Providers ([`providers`]) only describe request shape and response decoding
//! - Results are deduplicated by link (case-insensitive) and numbered `1..=N`
//! - At most 10 pages of 10 results per query, matching the upstream limits
//! - Every fetch takes a [`CancellationToken`]; cancelled fetches return no data
//!
//! ## Security
//!
//! - API keys never appear in error messages or logs
//! - Search queries are logged only at trace level

pub mod config;
pub mod error;
pub mod fetcher;
pub mod http;
pub mod provider;
pub mod providers;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use fetcher::SearchFetcher;
pub use provider::SearchProvider;
pub use providers::{AnyProvider, GoogleProvider, SerpApiProvider};
pub use tokio_util::sync::CancellationToken;
pub use types::{ProviderItem, ProviderKind, ResultItem};

/// Fetch results with the provider selected in `config`.
///
/// Convenience wrapper that builds a [`SearchFetcher`] for
/// `config.provider` and runs one fetch with `config.max_results`.
///
/// # Errors
///
/// Same as [`SearchFetcher::fetch`], plus configuration validation errors.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> web_search::Result<()> {
/// let mut config = web_search::SearchConfig::default();
/// config.google.api_key = Some("key".into());
/// config.google.cx = Some("engine-id".into());
/// let cancel = web_search::CancellationToken::new();
/// let results = web_search::fetch("rust programming", &config, &cancel).await?;
/// for item in &results {
///     println!("{}. {}", item.position, item.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn fetch(
    query: &str,
    config: &SearchConfig,
    cancel: &CancellationToken,
) -> Result<Vec<ResultItem>> {
    let provider = AnyProvider::from_config(config.provider, config);
    let fetcher = SearchFetcher::new(provider, config)?;
    fetcher.fetch(query, config.max_results, cancel).await
}
