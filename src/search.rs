//! Search-and-cache flow: serve a query from the store, or fetch and persist it.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use web_search::{AnyProvider, ProviderKind, SearchConfig, SearchFetcher};

use crate::error::{Error, Result};
use crate::results::{ResultCache, ResultStoreError, StoredResult, validate_query};

/// Where the rows of a [`SearchOutcome`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    /// Served from the result store without a network call.
    Cache,
    /// Fetched from the provider and stored before returning.
    Fetched,
}

/// Per-call overrides for [`SearchService::search`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Provider to use instead of the configured one.
    pub provider: Option<ProviderKind>,
    /// Result cap instead of the configured one.
    pub max_results: Option<usize>,
    /// Skip the cache and always fetch.
    pub refresh: bool,
}

/// Rows returned for one query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub source: ResultSource,
    /// Stored rows ordered by position; empty when the provider had nothing.
    pub rows: Vec<StoredResult>,
}

/// Composes the fetcher and the result store.
pub struct SearchService {
    config: SearchConfig,
    cache: ResultCache,
}

impl SearchService {
    /// Create a service; the config is validated here, not per call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Search`] if the search config is invalid.
    pub fn new(config: SearchConfig, cache: ResultCache) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, cache })
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Return rows for `query`, from the cache when possible.
    ///
    /// On a miss (or with `refresh`), fetches from the provider, replaces the
    /// stored batch for the query and returns the newly stored rows. A failed
    /// or cancelled fetch leaves the store untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for a blank or over-long query
    /// - [`Error::Search`] for any fetch failure
    /// - [`Error::Store`] for any store failure
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<SearchOutcome> {
        // Checked before any request so an unstorable query spends no quota.
        let query = validate_query(query).map_err(|e| match e {
            ResultStoreError::InvalidInput(msg) => Error::InvalidInput(msg),
            other => Error::Store(other),
        })?;

        if !options.refresh
            && let Some(hit) = self.cache.try_get_cached(query).await?
        {
            tracing::debug!(rows = hit.rows.len(), "served from cache");
            return Ok(SearchOutcome {
                query: hit.query,
                source: ResultSource::Cache,
                rows: hit.rows,
            });
        }

        let kind = options.provider.unwrap_or(self.config.provider);
        let max_results = options.max_results.unwrap_or(self.config.max_results);
        let fetcher = SearchFetcher::new(AnyProvider::from_config(kind, &self.config), &self.config)?;

        let items = fetcher.fetch(query, max_results, cancel).await?;
        let inserted = self.cache.replace(query, &items, cancel).await?;
        tracing::info!(provider = kind.name(), inserted, "search results stored");

        let rows = self.cache.get_for_query(query).await?;
        Ok(SearchOutcome {
            query: query.to_owned(),
            source: ResultSource::Fetched,
            rows,
        })
    }
}
