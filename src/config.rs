//! Application configuration, stored as TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use web_search::SearchConfig;

use crate::error::{Error, Result};

/// Environment variable holding the Google API key.
pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
/// Environment variable holding the Google search engine id.
pub const ENV_GOOGLE_CX: &str = "GOOGLE_CX";
/// Environment variable holding the SerpApi key.
pub const ENV_SERPAPI_API_KEY: &str = "SERPAPI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Provider selection, credentials and HTTP settings.
    pub search: SearchConfig,
    pub store: StoreConfig,
}

/// Result store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: crate::app_dirs::database_file(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from `path` if it exists, otherwise return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config file path: `config_dir()/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::app_dirs::config_file()
    }

    /// Fill credentials from the process environment.
    ///
    /// Non-blank environment values win over values from the file.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply credential overrides from an arbitrary variable lookup.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_GOOGLE_API_KEY) {
            self.search.google.api_key = Some(key);
        }
        if let Some(cx) = get(ENV_GOOGLE_CX) {
            self.search.google.cx = Some(cx);
        }
        if let Some(key) = get(ENV_SERPAPI_API_KEY) {
            self.search.serp_api.api_key = Some(key);
        }
        self
    }
}
