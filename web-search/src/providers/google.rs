//! Google Custom Search JSON API.
//!
//! Pages are addressed with a 1-based `start` parameter and at most 10
//! items per call (`num`). Requests need both an API key and a
//! Programmable Search Engine id (`cx`).

use serde::Deserialize;

use crate::config::{non_blank, GoogleConfig, GOOGLE_BASE_URL};
use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::types::{ProviderItem, ProviderKind};

/// Google Custom Search backend.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    api_key: Option<String>,
    cx: Option<String>,
    base_url: String,
}

impl GoogleProvider {
    /// Create a provider for the given key and search-engine id.
    pub fn new(api_key: impl Into<String>, cx: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            cx: Some(cx.into()),
            base_url: GOOGLE_BASE_URL.to_owned(),
        }
    }

    /// Build from config. Missing credentials are reported at fetch time.
    pub fn from_config(config: &GoogleConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            cx: config.cx.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn credentials(&self) -> Result<(&str, &str), SearchError> {
        match (non_blank(self.api_key.as_deref()), non_blank(self.cx.as_deref())) {
            (Some(key), Some(cx)) => Ok((key, cx)),
            _ => Err(SearchError::ConfigurationMissing(
                "Google API configuration missing; set google.api_key and google.cx".into(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Option<Vec<GoogleItem>>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    link: Option<String>,
    title: Option<String>,
    snippet: Option<String>,
    #[serde(rename = "displayLink")]
    display_link: Option<String>,
}

impl SearchProvider for GoogleProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Google
    }

    fn first_offset(&self) -> u32 {
        1
    }

    fn ensure_configured(&self) -> Result<(), SearchError> {
        self.credentials().map(|_| ())
    }

    fn build_request(
        &self,
        client: &reqwest::Client,
        query: &str,
        offset: u32,
        count: usize,
    ) -> Result<reqwest::RequestBuilder, SearchError> {
        let (key, cx) = self.credentials()?;
        let endpoint = format!("{}/customsearch/v1", self.base_url.trim_end_matches('/'));
        let start = offset.to_string();
        let num = count.to_string();
        tracing::trace!(query, offset, count, "Google page request");

        Ok(client.get(endpoint).query(&[
            ("key", key),
            ("cx", cx),
            ("q", query),
            ("start", start.as_str()),
            ("num", num.as_str()),
        ]))
    }

    fn parse_items(&self, body: &str) -> Result<Vec<ProviderItem>, SearchError> {
        parse_google_json(body)
    }
}

/// Parse a Google Custom Search response body.
///
/// A response with no `items` key (Google omits it when nothing matched)
/// yields an empty list.
fn parse_google_json(body: &str) -> Result<Vec<ProviderItem>, SearchError> {
    let response: GoogleResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::ResponseParse(format!("Google response: {e}")))?;

    let items: Vec<ProviderItem> = response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|item| ProviderItem {
            link: item.link,
            title: item.title,
            snippet: item.snippet,
            display_link: item.display_link,
        })
        .collect();

    tracing::debug!(count = items.len(), "Google items parsed");
    Ok(items)
}
