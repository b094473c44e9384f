//! Core types for fetched results and provider identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single ranked result produced by [`crate::SearchFetcher::fetch`].
///
/// `position` is 1-based and contiguous within one fetch batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// 1-based rank within the fetch batch.
    pub position: u32,
    /// Result link. Never empty.
    pub url: String,
    /// Page title as reported by the provider.
    pub title: Option<String>,
    /// Text snippet summarising the page.
    pub snippet: Option<String>,
    /// Short display form of the link (Google only).
    pub display_link: Option<String>,
}

/// One raw item as decoded from a provider page, before dedup and ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderItem {
    pub link: Option<String>,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub display_link: Option<String>,
}

/// Search APIs supported by this crate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Google Custom Search JSON API.
    #[default]
    Google,
    /// SerpApi Google engine.
    SerpApi,
}

impl ProviderKind {
    /// Returns the human-readable name of this provider.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::SerpApi => "SerpApi",
        }
    }

    /// Returns all available provider variants.
    pub fn all() -> &'static [ProviderKind] {
        &[Self::Google, Self::SerpApi]
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
