//! Configuration for gateway access and local filter persistence

use crate::error::{Result, ZivaasError};
use std::path::{Path, PathBuf};
use zivaas_common::FILTERS_FILENAME;

/// Connection settings for the hosted backend plus the location of the
/// persisted filter state
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the hosted backend (project URL, no trailing path)
    pub base_url: String,
    /// Anonymous API key issued by the backend
    pub api_key: String,
    /// File holding the persisted `Filters` entry
    pub filter_store_path: PathBuf,
}

impl GatewayConfig {
    /// Configuration with the default filter-store location
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            filter_store_path: Self::default_filter_store_path(),
        }
    }

    /// Override where the filter state is persisted
    #[must_use]
    pub fn with_filter_store_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.filter_store_path = path.as_ref().to_path_buf();
        self
    }

    /// Default location of the persisted filter state
    #[must_use]
    pub fn default_filter_store_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(format!("{home}/.config/zivaas/{FILTERS_FILENAME}"))
    }

    /// Create configuration from environment variables
    ///
    /// Reads `ZIVAAS_GATEWAY_URL`, `ZIVAAS_GATEWAY_KEY` and the optional
    /// `ZIVAAS_FILTER_STORE` override.
    ///
    /// # Errors
    /// Returns `ZivaasError::Configuration` when the URL or key is unset
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("ZIVAAS_GATEWAY_URL")
            .map_err(|_| ZivaasError::configuration("ZIVAAS_GATEWAY_URL is not set"))?;
        let api_key = std::env::var("ZIVAAS_GATEWAY_KEY")
            .map_err(|_| ZivaasError::configuration("ZIVAAS_GATEWAY_KEY is not set"))?;

        let mut config = Self::new(base_url, api_key);
        if let Ok(path) = std::env::var("ZIVAAS_FILTER_STORE") {
            config.filter_store_path = PathBuf::from(path);
        }
        Ok(config)
    }

    /// Create configuration for testing with a temporary filter store
    ///
    /// # Errors
    /// Returns `ZivaasError::Io` if the temporary directory cannot be
    /// created
    pub fn for_testing() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        // Keep the directory alive for the process; tests only need a
        // writable unique path
        let path = dir.into_path().join(FILTERS_FILENAME);
        Ok(Self::new("http://localhost:54321", "test-key").with_filter_store_path(path))
    }
}
