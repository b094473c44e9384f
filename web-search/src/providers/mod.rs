//! Search API implementations.
//!
//! Each module provides a struct implementing [`crate::provider::SearchProvider`]
//! for one upstream API. [`AnyProvider`] selects between them at runtime.

pub mod google;
pub mod serp_api;

pub use google::GoogleProvider;
pub use serp_api::SerpApiProvider;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::provider::SearchProvider;
use crate::types::{ProviderItem, ProviderKind};

/// A provider chosen from configuration.
#[derive(Debug, Clone)]
pub enum AnyProvider {
    Google(GoogleProvider),
    SerpApi(SerpApiProvider),
}

impl AnyProvider {
    /// Build the provider of the given kind from its config section.
    pub fn from_config(kind: ProviderKind, config: &SearchConfig) -> Self {
        match kind {
            ProviderKind::Google => Self::Google(GoogleProvider::from_config(&config.google)),
            ProviderKind::SerpApi => {
                Self::SerpApi(SerpApiProvider::from_config(&config.serp_api))
            }
        }
    }

    fn inner(&self) -> &dyn SearchProvider {
        match self {
            Self::Google(p) => p,
            Self::SerpApi(p) => p,
        }
    }
}

impl SearchProvider for AnyProvider {
    fn kind(&self) -> ProviderKind {
        self.inner().kind()
    }

    fn first_offset(&self) -> u32 {
        self.inner().first_offset()
    }

    fn ensure_configured(&self) -> Result<(), SearchError> {
        self.inner().ensure_configured()
    }

    fn build_request(
        &self,
        client: &reqwest::Client,
        query: &str,
        offset: u32,
        count: usize,
    ) -> Result<reqwest::RequestBuilder, SearchError> {
        self.inner().build_request(client, query, offset, count)
    }

    fn parse_items(&self, body: &str) -> Result<Vec<ProviderItem>, SearchError> {
        self.inner().parse_items(body)
    }
}
