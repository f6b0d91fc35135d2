//! Token resolution and client construction
//!
//! Builds the rate limited client the discovery pipeline talks to, resolving
//! the GitHub token from the usual places on the way.

use crate::{
    OctocrabClient, RateLimitedClient, RateLimiter, DEFAULT_API_BASE_URL, DEFAULT_HOST,
    DEFAULT_RAW_HOST,
};
use anyhow::{Context, Result};
use log::{debug, info};
use octocrab::Octocrab;
use std::sync::Arc;

/// Resolves the GitHub token
///
/// Tries multiple sources in order:
/// 1. Explicitly provided token (e.g., a command line flag)
/// 2. Generic `GITHUB_TOKEN` or `GH_TOKEN`
/// 3. `gh auth token --hostname {host}` command
#[derive(Debug, Clone)]
pub struct TokenResolver {
    /// Token handed in by the caller
    explicit_token: Option<String>,
    /// Cached default token from GITHUB_TOKEN/GH_TOKEN
    default_token: Option<String>,
}

impl Default for TokenResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenResolver {
    /// Create a new token resolver reading the environment
    pub fn new() -> Self {
        let default_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .ok()
            .filter(|token| !token.trim().is_empty());

        Self {
            explicit_token: None,
            default_token,
        }
    }

    /// Prefer the given token over every other source
    ///
    /// Empty strings are treated as "not provided".
    pub fn with_explicit_token(mut self, token: Option<String>) -> Self {
        self.explicit_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Get a token for the given host
    ///
    /// # Arguments
    ///
    /// * `host` - The GitHub host (None = github.com)
    pub async fn get_token(&self, host: Option<&str>) -> Result<String> {
        let host = host.unwrap_or(DEFAULT_HOST);

        if let Some(ref token) = self.explicit_token {
            debug!("Using explicitly provided token for host {}", host);
            return Ok(token.clone());
        }

        if let Some(ref token) = self.default_token {
            debug!("Using default token (GITHUB_TOKEN/GH_TOKEN) for {}", host);
            return Ok(token.clone());
        }

        // Try gh CLI with hostname
        debug!("Trying gh auth token for host {}", host);
        if let Ok(output) = tokio::process::Command::new("gh")
            .args(["auth", "token", "--hostname", host])
            .output()
            .await
        {
            if output.status.success() {
                let token = String::from_utf8(output.stdout)
                    .context("Invalid UTF-8 in gh auth token output")?
                    .trim()
                    .to_string();
                if !token.is_empty() {
                    debug!("Using token from gh CLI for host {}", host);
                    return Ok(token);
                }
            }
        }

        Err(anyhow::anyhow!(
            "GitHub token is required (set GITHUB_TOKEN, use --token, \
             or run 'gh auth login --hostname {}')",
            host
        ))
    }
}

/// Builds rate limited GitHub clients
///
/// Every client created by one manager shares the manager's limiter.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{ClientManager, RateLimiter, TokenResolver};
/// use std::sync::Arc;
///
/// let limiter = Arc::new(RateLimiter::per_second(10));
/// let manager = ClientManager::new(TokenResolver::new(), limiter);
/// let client = manager.create_client().await?;
/// ```
#[derive(Debug, Clone)]
pub struct ClientManager {
    /// Token resolver
    tokens: TokenResolver,
    /// Shared request pacing
    limiter: Arc<RateLimiter>,
    /// REST API base URL
    api_base_url: String,
    /// Host for raw file access
    raw_host: String,
}

impl ClientManager {
    /// Create a new client manager targeting github.com
    pub fn new(tokens: TokenResolver, limiter: Arc<RateLimiter>) -> Self {
        Self {
            tokens,
            limiter,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            raw_host: DEFAULT_RAW_HOST.to_string(),
        }
    }

    /// Target a different REST API base URL (GitHub Enterprise, test servers)
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    /// Fetch raw files from a different host
    pub fn with_raw_host(mut self, raw_host: impl Into<String>) -> Self {
        self.raw_host = raw_host.into();
        self
    }

    /// The limiter handed to every client
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// The configured REST API base URL
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Create a new rate limited client
    pub async fn create_client(&self) -> Result<RateLimitedClient<OctocrabClient>> {
        let host = api_host(&self.api_base_url);
        info!("Creating GitHub client for {}", self.api_base_url);

        let token = self.tokens.get_token(host.as_deref()).await?;

        let mut builder = Octocrab::builder().personal_token(token);
        if self.api_base_url != DEFAULT_API_BASE_URL {
            builder = builder
                .base_uri(self.api_base_url.as_str())
                .context("Failed to set base URI")?;
        }
        let octocrab = builder.build().context("Failed to build Octocrab client")?;

        let client = OctocrabClient::new(Arc::new(octocrab)).with_raw_host(self.raw_host.clone());
        Ok(RateLimitedClient::new(client, Arc::clone(&self.limiter)))
    }
}

/// Host part of an API base URL, `None` for github.com
fn api_host(api_base_url: &str) -> Option<String> {
    if api_base_url == DEFAULT_API_BASE_URL {
        return None;
    }
    let without_scheme = api_base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(api_base_url);
    without_scheme
        .split('/')
        .next()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}
