//! Core fetch loop: request pages until the cap, the offset limit or the
//! end of upstream results is reached.

use tokio_util::sync::CancellationToken;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http;
use crate::provider::{check_status, SearchProvider};
use crate::types::{ProviderItem, ResultItem};

use super::dedup::ResultAccumulator;
use super::pagination::{PageWindows, WINDOW_SIZE};

/// Fetches a deduplicated, capped, positionally ordered result list from
/// one provider.
///
/// The fetcher holds no mutable state; one instance can serve concurrent
/// fetches for different queries.
#[derive(Debug, Clone)]
pub struct SearchFetcher<P> {
    provider: P,
    client: reqwest::Client,
}

impl<P: SearchProvider> SearchFetcher<P> {
    /// Create a fetcher with an HTTP client built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidInput`] if `config` fails validation, or
    /// [`SearchError::Http`] if the client cannot be built.
    pub fn new(provider: P, config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = http::build_client(config)?;
        Ok(Self { provider, client })
    }

    /// Create a fetcher around an existing client.
    pub fn with_client(provider: P, client: reqwest::Client) -> Self {
        Self { provider, client }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetch up to `max_results` results for `query`.
    ///
    /// # Pipeline
    ///
    /// 1. Reject a blank query, then check provider credentials
    /// 2. Walk page offsets from the provider's first offset in windows of
    ///    [`WINDOW_SIZE`], requesting `min(10, remaining)` items per page
    /// 3. Skip items without a link or with an already-seen link
    ///    (case-insensitive); number the rest `1..=N`
    /// 4. Stop at the cap, past offset 91, on an empty page, or on a page
    ///    shorter than requested
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidInput`] for a blank query
    /// - [`SearchError::ConfigurationMissing`] when credentials are absent
    /// - [`SearchError::QuotaOrAuth`] on HTTP 403
    /// - [`SearchError::UpstreamRequestFailed`] on any other non-success status
    /// - [`SearchError::ResponseParse`] on a malformed body
    /// - [`SearchError::Http`] on transport failure or timeout
    /// - [`SearchError::Cancelled`] if `cancel` fires first
    ///
    /// Errors are never retried and no partial list is returned.
    pub async fn fetch(
        &self,
        query: &str,
        max_results: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<ResultItem>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidInput("query must not be empty".into()));
        }
        self.provider.ensure_configured()?;

        let provider = self.provider.kind();
        let mut results = ResultAccumulator::new(max_results);
        let mut windows = PageWindows::new(self.provider.first_offset());

        while !results.is_full() {
            let Some(offset) = windows.next() else {
                break;
            };
            let requested = results.remaining().min(WINDOW_SIZE);
            let page = self.fetch_page(query, offset, requested, cancel).await?;
            let received = page.len();
            let added = results.extend(page);
            tracing::debug!(%provider, offset, requested, received, added, "page fetched");

            if received == 0 || received < requested {
                break;
            }
        }

        tracing::debug!(%provider, count = results.len(), "fetch complete");
        Ok(results.into_items())
    }

    /// Request and decode a single page, racing it against `cancel`.
    async fn fetch_page(
        &self,
        query: &str,
        offset: u32,
        count: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<ProviderItem>, SearchError> {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        let request = self
            .provider
            .build_request(&self.client, query, offset, count)?;

        let exchange = async {
            let response = request.send().await.map_err(|e| {
                SearchError::Http(format!("{} request failed: {e}", self.provider.name()))
            })?;
            let status = response.status();
            let body = response.text().await.map_err(|e| {
                SearchError::Http(format!("{} response read failed: {e}", self.provider.name()))
            })?;
            check_status(self.provider.kind(), status, &body)?;
            self.provider.parse_items(&body)
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SearchError::Cancelled),
            outcome = exchange => outcome,
        }
    }
}
