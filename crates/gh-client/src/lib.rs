//! GitHub API client with rate limiting support
//!
//! This crate provides a trait-based GitHub API client covering the handful
//! of operations repository discovery needs. Pacing is added by wrapping the
//! base client in a decorator that shares one process-wide rate limiter.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              GitHubClient trait                  │
//! │  - search_code_page()                            │
//! │  - list_issues_page()                            │
//! │  - file_exists() / fetch_file_content()          │
//! │  - create_issue()                                │
//! └─────────────────────────────────────────────────┘
//!                        │
//!        ┌───────────────┴───────────────┐
//!        ▼                               ▼
//! ┌─────────────────┐         ┌─────────────────────┐
//! │ OctocrabClient  │         │ RateLimitedClient   │
//! │ (direct API)    │◄────────│ (decorator)         │
//! └─────────────────┘         └─────────────────────┘
//!                                       │
//!                                       ▼
//!                             ┌─────────────────────┐
//!                             │ RateLimiter (shared)│
//!                             └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use gh_client::{GitHubClient, OctocrabClient, RateLimitedClient, RateLimiter};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let octocrab = octocrab::Octocrab::builder()
//!     .personal_token("token".to_string())
//!     .build()?;
//!
//! let limiter = Arc::new(RateLimiter::new(Duration::from_millis(100)));
//! let client = RateLimitedClient::new(
//!     OctocrabClient::new(Arc::new(octocrab)),
//!     Arc::clone(&limiter),
//! );
//!
//! let page = client
//!     .search_code_page("filename:.enhansome.jsonc path:/", 1, 100)
//!     .await?;
//! println!("{} repositories on page 1", page.repositories.len());
//!
//! limiter.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod client_manager;
pub mod octocrab_client;
pub mod rate_limited_client;
pub mod rate_limiter;
pub mod types;

/// Default GitHub host (public GitHub)
pub const DEFAULT_HOST: &str = "github.com";

/// Default REST API base URL for github.com
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default host serving raw repository files
pub const DEFAULT_RAW_HOST: &str = "raw.githubusercontent.com";

pub use client::{raw_content_url, GitHubClient};
pub use client_manager::{ClientManager, TokenResolver};
pub use octocrab_client::OctocrabClient;
pub use rate_limited_client::RateLimitedClient;
pub use rate_limiter::{RateLimiter, RateLimiterStopped};
pub use types::{IssueSummary, NewIssue, SearchPage};

// Re-export octocrab so consumers don't need to depend on it directly
pub use octocrab;
