//! Client configuration loaded from environment variables.

use std::path::PathBuf;

/// Connection settings for the identity service and local persistence.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the identity API, e.g. `https://api.tourbook.example/api/v1`.
    pub api_url: String,
    /// Directory for the file-backed session store. `None` means the
    /// caller supplies its own store (typically in-memory).
    pub storage_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Load from `TOURBOOK_API_URL` and `TOURBOOK_STORAGE_DIR`.
    /// Returns `None` if the API URL is missing (the client cannot run
    /// without one); the storage directory is optional.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_url = std::env::var("TOURBOOK_API_URL").ok()?;
        let storage_dir = std::env::var("TOURBOOK_STORAGE_DIR").ok().map(PathBuf::from);
        Some(Self { api_url, storage_dir })
    }

    /// Build a config with an explicit API base URL and no storage directory.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self { api_url: api_url.into(), storage_dir: None }
    }

    /// Set the directory used by the file-backed session store.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
