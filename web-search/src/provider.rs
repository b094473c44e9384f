//! Trait definition for pluggable search API backends.
//!
//! Each provider (Google Custom Search, SerpApi) implements
//! [`SearchProvider`] to describe how one page is requested and how its
//! body is decoded. Pagination, dedup and ranking live once in
//! [`crate::fetcher`] and are shared by every provider.

use crate::error::SearchError;
use crate::types::{ProviderItem, ProviderKind};

/// A search API backend.
///
/// Implementors only know their own wire format:
///
/// - which offset the first page starts at
/// - how to turn `(query, offset, count)` into an HTTP request
/// - how to decode a successful response body into [`ProviderItem`]s
///
/// All implementations must be `Send + Sync` so a fetcher can be shared
/// between tasks.
pub trait SearchProvider: Send + Sync {
    /// Returns which [`ProviderKind`] this implementation represents.
    fn kind(&self) -> ProviderKind;

    /// Offset of the first page in this API's convention (1-based or 0-based).
    fn first_offset(&self) -> u32;

    /// Check that the credentials this provider needs are present.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ConfigurationMissing`] naming the missing keys.
    fn ensure_configured(&self) -> Result<(), SearchError>;

    /// Build the request for one page of `count` items starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ConfigurationMissing`] if credentials are absent.
    fn build_request(
        &self,
        client: &reqwest::Client,
        query: &str,
        offset: u32,
        count: usize,
    ) -> Result<reqwest::RequestBuilder, SearchError>;

    /// Decode a successful response body into items, in the order returned.
    ///
    /// A body without a result list decodes to an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::ResponseParse`] if the body is not valid JSON
    /// of the expected shape.
    fn parse_items(&self, body: &str) -> Result<Vec<ProviderItem>, SearchError>;

    /// Returns the human-readable provider name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Map a non-success HTTP status to the matching [`SearchError`].
///
/// 403 is reported as [`SearchError::QuotaOrAuth`]; everything else that is
/// not 2xx becomes [`SearchError::UpstreamRequestFailed`].
pub fn check_status(
    provider: ProviderKind,
    status: reqwest::StatusCode,
    body: &str,
) -> Result<(), SearchError> {
    if status == reqwest::StatusCode::FORBIDDEN {
        tracing::warn!(%provider, "upstream returned 403 Forbidden");
        return Err(SearchError::QuotaOrAuth {
            provider: provider.name(),
            body: body.to_owned(),
        });
    }
    if !status.is_success() {
        tracing::warn!(%provider, status = status.as_u16(), "upstream request failed");
        return Err(SearchError::UpstreamRequestFailed {
            status: status.as_u16(),
            body: body.to_owned(),
        });
    }
    Ok(())
}
