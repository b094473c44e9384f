//! Application directory paths for sister-search.
//!
//! Uses the [`dirs`] crate for platform-appropriate locations.
//!
//! | Purpose | Linux | macOS |
//! |---------|-------|-------|
//! | Data | `~/.local/share/sister-search/` | `~/Library/Application Support/sister-search/` |
//! | Config | `~/.config/sister-search/` | `~/Library/Application Support/sister-search/` |
//!
//! # Environment Overrides
//!
//! - `SISTER_SEARCH_DATA_DIR` overrides [`data_dir`]
//! - `SISTER_SEARCH_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

const APP_DIR_NAME: &str = "sister-search";

/// Persistent data root; holds the result database.
///
/// Resolves to `dirs::data_local_dir()/sister-search/` by default.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SISTER_SEARCH_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join("sister-search-data"))
}

/// Configuration directory.
///
/// Resolves to `dirs::config_dir()/sister-search/` by default.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SISTER_SEARCH_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join("sister-search-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Default result database path (`data_dir()/results.db`).
#[must_use]
pub fn database_file() -> PathBuf {
    data_dir().join("results.db")
}
