//! GitHub client trait
//!
//! This module defines the core `GitHubClient` trait that all client
//! implementations must satisfy, plus the raw content URL convention shared
//! by callers that check files directly.

use crate::types::{IssueSummary, NewIssue, SearchPage};
use async_trait::async_trait;
use std::sync::Arc;

/// Build the raw content URL for a file on a branch
///
/// `https://{raw_host}/{owner}/{repo}/{branch}/{path}`
pub fn raw_content_url(raw_host: &str, owner: &str, repo: &str, branch: &str, path: &str) -> String {
    format!(
        "https://{}/{}/{}/{}/{}",
        raw_host.trim_end_matches('/'),
        owner,
        repo,
        branch,
        path.trim_start_matches('/')
    )
}

/// GitHub API client trait
///
/// Defines the interface the discovery pipeline needs from GitHub.
/// Implementations can be direct (hitting the API) or decorated
/// with rate limiting, retry logic, etc.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow sharing across
/// worker tasks.
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::GitHubClient;
///
/// async fn first_page(client: &dyn GitHubClient) -> anyhow::Result<usize> {
///     let page = client.search_code_page("filename:README.json", 1, 100).await?;
///     Ok(page.repositories.len())
/// }
/// ```
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// Fetch one page of code search results
    ///
    /// # Arguments
    ///
    /// * `query` - Code search query (e.g., `filename:.enhansome.jsonc path:/`)
    /// * `page` - 1-based page number
    /// * `per_page` - Page size (GitHub caps this at 100)
    ///
    /// # Returns
    ///
    /// The repositories owning each hit plus the total hit count.
    async fn search_code_page(
        &self,
        query: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<SearchPage>;

    /// Fetch one page of open issues carrying all of the given labels
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `labels` - Label filter
    /// * `page` - 1-based page number
    /// * `per_page` - Page size
    async fn list_issues_page(
        &self,
        owner: &str,
        repo: &str,
        labels: &[String],
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<IssueSummary>>;

    /// Check whether a URL answers a HEAD request with 200 OK
    ///
    /// Returns `Ok(false)` for any other status; transport failures are errors.
    async fn file_exists(&self, url: &str) -> anyhow::Result<bool>;

    /// Fetch the raw content of a file on a branch
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner
    /// * `repo` - Repository name
    /// * `branch` - Branch name (e.g., "main")
    /// * `path` - File path relative to the repository root
    async fn fetch_file_content(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> anyhow::Result<String>;

    /// Open an issue
    ///
    /// # Returns
    ///
    /// The number of the created issue.
    async fn create_issue(&self, owner: &str, repo: &str, issue: &NewIssue)
        -> anyhow::Result<u64>;
}

/// Shared clients are clients too, so decorators can wrap an `Arc`
#[async_trait]
impl<T: GitHubClient + ?Sized> GitHubClient for Arc<T> {
    async fn search_code_page(
        &self,
        query: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<SearchPage> {
        (**self).search_code_page(query, page, per_page).await
    }

    async fn list_issues_page(
        &self,
        owner: &str,
        repo: &str,
        labels: &[String],
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<IssueSummary>> {
        (**self)
            .list_issues_page(owner, repo, labels, page, per_page)
            .await
    }

    async fn file_exists(&self, url: &str) -> anyhow::Result<bool> {
        (**self).file_exists(url).await
    }

    async fn fetch_file_content(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> anyhow::Result<String> {
        (**self).fetch_file_content(owner, repo, branch, path).await
    }

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> anyhow::Result<u64> {
        (**self).create_issue(owner, repo, issue).await
    }
}
