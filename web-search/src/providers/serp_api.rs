//! SerpApi (Google engine) backend.
//!
//! SerpApi proxies Google results behind its own key. Pages use a 0-based
//! `start` offset; results arrive under `organic_results`. SerpApi also
//! reports its own `position` per item, which is ignored here: ranks are
//! reassigned after dedup so they stay contiguous.

use serde::Deserialize;

use crate::config::{non_blank, SerpApiConfig, SERP_API_BASE_URL};
use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::types::{ProviderItem, ProviderKind};

/// SerpApi backend.
#[derive(Debug, Clone)]
pub struct SerpApiProvider {
    api_key: Option<String>,
    base_url: String,
}

impl SerpApiProvider {
    /// Create a provider for the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: SERP_API_BASE_URL.to_owned(),
        }
    }

    /// Build from config. A missing key is reported at fetch time.
    pub fn from_config(config: &SerpApiConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn api_key(&self) -> Result<&str, SearchError> {
        non_blank(self.api_key.as_deref()).ok_or_else(|| {
            SearchError::ConfigurationMissing(
                "SerpApi configuration missing; set serp_api.api_key".into(),
            )
        })
    }
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Option<Vec<SerpOrganicResult>>,
}

#[derive(Debug, Deserialize)]
struct SerpOrganicResult {
    link: Option<String>,
    title: Option<String>,
    snippet: Option<String>,
    displayed_link: Option<String>,
}

impl SearchProvider for SerpApiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::SerpApi
    }

    fn first_offset(&self) -> u32 {
        0
    }

    fn ensure_configured(&self) -> Result<(), SearchError> {
        self.api_key().map(|_| ())
    }

    fn build_request(
        &self,
        client: &reqwest::Client,
        query: &str,
        offset: u32,
        count: usize,
    ) -> Result<reqwest::RequestBuilder, SearchError> {
        let key = self.api_key()?;
        let endpoint = format!("{}/search.json", self.base_url.trim_end_matches('/'));
        let start = offset.to_string();
        let num = count.to_string();
        tracing::trace!(query, offset, count, "SerpApi page request");

        Ok(client.get(endpoint).query(&[
            ("engine", "google"),
            ("q", query),
            ("num", num.as_str()),
            ("start", start.as_str()),
            ("api_key", key),
        ]))
    }

    fn parse_items(&self, body: &str) -> Result<Vec<ProviderItem>, SearchError> {
        parse_serp_json(body)
    }
}

/// Parse a SerpApi search response body.
///
/// SerpApi omits `organic_results` when Google returned nothing, which
/// yields an empty list.
fn parse_serp_json(body: &str) -> Result<Vec<ProviderItem>, SearchError> {
    let response: SerpResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::ResponseParse(format!("SerpApi response: {e}")))?;

    let items: Vec<ProviderItem> = response
        .organic_results
        .unwrap_or_default()
        .into_iter()
        .map(|r| ProviderItem {
            link: r.link,
            title: r.title,
            snippet: r.snippet,
            display_link: r.displayed_link,
        })
        .collect();

    tracing::debug!(count = items.len(), "SerpApi items parsed");
    Ok(items)
}
