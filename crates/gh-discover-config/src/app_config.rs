//! Application configuration
//!
//! Configuration loaded from a `.gh-discover.toml` file. Every field has a
//! default, so a partial file (or no file at all) is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// GitHub caps list and search pages at 100 items
pub const MAX_PER_PAGE: u8 = 100;

/// Application configuration loaded from .gh-discover.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// REST API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Host serving raw repository files
    #[serde(default = "default_raw_host")]
    pub raw_host: String,

    /// Branch checked for the marker and metadata files
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Code search query locating candidate repositories
    #[serde(default = "default_search_query")]
    pub search_query: String,

    /// Metadata file whose presence makes a repository eligible
    #[serde(default = "default_marker_file")]
    pub marker_file: String,

    /// Discovery configuration file shown in the issue preview
    #[serde(default = "default_config_file")]
    pub config_file: String,

    /// Page size for search and issue listing (1..=100)
    #[serde(default = "default_per_page")]
    pub per_page: u8,

    /// Number of enrichment workers; zero or negative means the default
    #[serde(default = "default_workers")]
    pub workers: i64,

    /// Milliseconds between two network requests
    #[serde(default = "default_rate_limit_interval_ms")]
    pub rate_limit_interval_ms: u64,

    /// Label marking tracking issues (also the issue list filter)
    #[serde(default = "default_tracking_label")]
    pub tracking_label: String,

    /// Additional label put on new tracking issues
    #[serde(default = "default_review_label")]
    pub review_label: String,

    /// Pre-approved repositories
    #[serde(default = "default_allowlist_path")]
    pub allowlist_path: PathBuf,

    /// Rejected repositories (optional file)
    #[serde(default = "default_denylist_path")]
    pub denylist_path: PathBuf,
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_host() -> String {
    "raw.githubusercontent.com".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_search_query() -> String {
    "filename:.enhansome.jsonc path:/ registryIndexing".to_string()
}

fn default_marker_file() -> String {
    "README.json".to_string()
}

fn default_config_file() -> String {
    ".enhansome.jsonc".to_string()
}

fn default_per_page() -> u8 {
    MAX_PER_PAGE
}

fn default_workers() -> i64 {
    5
}

fn default_rate_limit_interval_ms() -> u64 {
    100 // 10 requests per second
}

fn default_tracking_label() -> String {
    "auto-discovery".to_string()
}

fn default_review_label() -> String {
    "needs-review".to_string()
}

fn default_allowlist_path() -> PathBuf {
    PathBuf::from("allowlist.txt")
}

fn default_denylist_path() -> PathBuf {
    PathBuf::from("denylist.txt")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            raw_host: default_raw_host(),
            default_branch: default_branch(),
            search_query: default_search_query(),
            marker_file: default_marker_file(),
            config_file: default_config_file(),
            per_page: default_per_page(),
            workers: default_workers(),
            rate_limit_interval_ms: default_rate_limit_interval_ms(),
            tracking_label: default_tracking_label(),
            review_label: default_review_label(),
            allowlist_path: default_allowlist_path(),
            denylist_path: default_denylist_path(),
        }
    }
}

impl AppConfig {
    /// Load config from an explicit path, or search CWD then the user config dir
    ///
    /// An explicit path must exist and parse. A discovered file that fails to
    /// parse is reported and replaced by the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let config = Self::from_toml(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            log::info!("Loaded config from {}", path.display());
            return Ok(config);
        }

        if let Some((path, content)) = crate::load_config_file() {
            match Self::from_toml(&content) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {}: {}", path.display(), e);
                }
            }
        }

        log::debug!("Using default config");
        Ok(Self::default())
    }

    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Page size clamped to what the API accepts
    pub fn effective_per_page(&self) -> u8 {
        match self.per_page {
            0 => MAX_PER_PAGE,
            n => n.min(MAX_PER_PAGE),
        }
    }

    /// Labels put on newly created tracking issues
    pub fn issue_labels(&self) -> Vec<String> {
        vec![self.tracking_label.clone(), self.review_label.clone()]
    }
}
