//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] selects the provider, carries its credentials and
//! controls the HTTP timeout and default result cap. It is read-only after
//! startup and injected into each [`crate::SearchFetcher`] at construction.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::ProviderKind;

/// Default Google Custom Search API host.
pub const GOOGLE_BASE_URL: &str = "https://www.googleapis.com";
/// Default SerpApi host.
pub const SERP_API_BASE_URL: &str = "https://serpapi.com";

/// Configuration for fetching search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Which provider the caller uses by default.
    pub provider: ProviderKind,
    /// Default result cap when the caller does not pass one.
    pub max_results: usize,
    /// Client-level HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent string. `None` uses the crate default.
    pub user_agent: Option<String>,
    /// Google Custom Search credentials.
    pub google: GoogleConfig,
    /// SerpApi credentials.
    pub serp_api: SerpApiConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Google,
            max_results: 100,
            timeout_seconds: 30,
            user_agent: None,
            google: GoogleConfig::default(),
            serp_api: SerpApiConfig::default(),
        }
    }
}

/// Google Custom Search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    pub api_key: Option<String>,
    /// Programmable Search Engine id (`cx`).
    pub cx: Option<String>,
    pub base_url: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            cx: None,
            base_url: GOOGLE_BASE_URL.to_owned(),
        }
    }
}

/// SerpApi settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerpApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: SERP_API_BASE_URL.to_owned(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - both base URLs must parse as absolute URLs
    ///
    /// Credentials are checked per fetch by the provider, so a config with
    /// only one provider configured is valid.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::InvalidInput(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        for base in [&self.google.base_url, &self.serp_api.base_url] {
            url::Url::parse(base)
                .map_err(|e| SearchError::InvalidInput(format!("invalid base_url {base}: {e}")))?;
        }
        Ok(())
    }
}

/// Returns the trimmed value if present and not blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
