//! Error types for the web-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys appear in error messages.

/// Errors that can occur while fetching results from a search API.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The caller supplied an empty or otherwise unusable argument.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Provider credentials are not configured.
    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    /// The upstream API answered 403 Forbidden. Usually quota, billing or
    /// an API key restriction.
    #[error("{provider} returned 403 Forbidden (quota, billing or API key restriction): {body}")]
    QuotaOrAuth {
        /// Provider name, e.g. `"Google"`.
        provider: &'static str,
        /// Raw response body for diagnostics.
        body: String,
    },

    /// The upstream API answered with any other non-success status.
    #[error("upstream request failed with HTTP {status}: {body}")]
    UpstreamRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Raw response body for diagnostics.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("parse error: {0}")]
    ResponseParse(String),

    /// Transport-level failure (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The fetch was cancelled before it completed.
    #[error("search cancelled")]
    Cancelled,
}

impl SearchError {
    /// Whether this error means the upstream rejected our credentials or quota.
    pub fn is_quota_or_auth(&self) -> bool {
        matches!(self, Self::QuotaOrAuth { .. })
    }
}

/// Convenience type alias for web-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
