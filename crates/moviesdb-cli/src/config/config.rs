//! `AppConfig` struct and TOML loading.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Page size limits.
    #[serde(default)]
    pub pages: PagesConfig,
}

/// TMDB API configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the TMDB v3 API.
    pub base_url: String,
    /// Language sent with every read.
    pub language: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://api.themoviedb.org/3/"),
            language: String::from("en-US"),
            timeout_secs: 50,
        }
    }
}

impl ApiConfig {
    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Maximum number of entries shown per list.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PagesConfig {
    /// Entries on the top rated page.
    pub top_rated_limit: usize,
    /// Entries per list on the home page.
    pub home_limit: usize,
    /// Recommendations on the movie page.
    pub recommendations_limit: usize,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            top_rated_limit: 50,
            home_limit: 20,
            recommendations_limit: 10,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if `api.timeout_secs` is zero.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        ensure!(
            config.api.timeout_secs > 0,
            "invalid {}: api.timeout_secs must be at least 1",
            path.display()
        );
        Ok(config)
    }
}
