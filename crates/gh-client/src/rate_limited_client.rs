//! Rate limited GitHub API client (decorator pattern)
//!
//! Wraps any `GitHubClient` implementation so that every call first takes a
//! permit from a shared `RateLimiter`. All clones of the decorator, and any
//! other decorator built from the same limiter, draw from the same quota.

use crate::client::GitHubClient;
use crate::rate_limiter::RateLimiter;
use crate::types::{IssueSummary, NewIssue, SearchPage};
use async_trait::async_trait;
use std::sync::Arc;

/// Rate limited GitHub API client using the decorator pattern
///
/// # Example
///
/// ```rust,ignore
/// use gh_client::{OctocrabClient, RateLimitedClient, RateLimiter};
/// use std::sync::Arc;
///
/// let octocrab = Arc::new(octocrab::Octocrab::builder().build().unwrap());
/// let limiter = Arc::new(RateLimiter::per_second(10));
///
/// let client = RateLimitedClient::new(OctocrabClient::new(octocrab), limiter);
/// ```
#[derive(Debug, Clone)]
pub struct RateLimitedClient<C: GitHubClient> {
    inner: C,
    limiter: Arc<RateLimiter>,
}

impl<C: GitHubClient> RateLimitedClient<C> {
    /// Create a new rate limited client
    ///
    /// # Arguments
    ///
    /// * `inner` - The inner client to delegate API calls to
    /// * `limiter` - Shared limiter; one permit is taken per call
    pub fn new(inner: C, limiter: Arc<RateLimiter>) -> Self {
        Self { inner, limiter }
    }

    /// Get a reference to the inner client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// The shared limiter
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }
}

#[async_trait]
impl<C: GitHubClient> GitHubClient for RateLimitedClient<C> {
    async fn search_code_page(
        &self,
        query: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<SearchPage> {
        self.limiter.acquire().await?;
        self.inner.search_code_page(query, page, per_page).await
    }

    async fn list_issues_page(
        &self,
        owner: &str,
        repo: &str,
        labels: &[String],
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<IssueSummary>> {
        self.limiter.acquire().await?;
        self.inner
            .list_issues_page(owner, repo, labels, page, per_page)
            .await
    }

    async fn file_exists(&self, url: &str) -> anyhow::Result<bool> {
        self.limiter.acquire().await?;
        self.inner.file_exists(url).await
    }

    async fn fetch_file_content(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> anyhow::Result<String> {
        self.limiter.acquire().await?;
        self.inner.fetch_file_content(owner, repo, branch, path).await
    }

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> anyhow::Result<u64> {
        self.limiter.acquire().await?;
        self.inner.create_issue(owner, repo, issue).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Mock client for testing
    #[derive(Debug, Clone, Default)]
    struct MockClient {
        call_count: Arc<Mutex<usize>>,
    }

    impl MockClient {
        fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl GitHubClient for MockClient {
        async fn search_code_page(
            &self,
            _query: &str,
            _page: u32,
            _per_page: u8,
        ) -> anyhow::Result<SearchPage> {
            *self.call_count.lock().unwrap() += 1;
            Ok(SearchPage {
                repositories: vec!["octocat/awesome".to_string()],
                total_count: 1,
            })
        }

        async fn list_issues_page(
            &self,
            _owner: &str,
            _repo: &str,
            _labels: &[String],
            _page: u32,
            _per_page: u8,
        ) -> anyhow::Result<Vec<IssueSummary>> {
            *self.call_count.lock().unwrap() += 1;
            Ok(vec![])
        }

        async fn file_exists(&self, _url: &str) -> anyhow::Result<bool> {
            *self.call_count.lock().unwrap() += 1;
            Ok(true)
        }

        async fn fetch_file_content(
            &self,
            _owner: &str,
            _repo: &str,
            _branch: &str,
            _path: &str,
        ) -> anyhow::Result<String> {
            *self.call_count.lock().unwrap() += 1;
            Ok("{}".to_string())
        }

        async fn create_issue(
            &self,
            _owner: &str,
            _repo: &str,
            _issue: &NewIssue,
        ) -> anyhow::Result<u64> {
            *self.call_count.lock().unwrap() += 1;
            Ok(1)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_call_takes_a_permit() {
        let mock = MockClient::default();
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(100)));
        let client = RateLimitedClient::new(mock.clone(), limiter);
        let start = Instant::now();

        client.search_code_page("q", 1, 100).await.unwrap();
        client.file_exists("https://example.com").await.unwrap();
        client
            .fetch_file_content("octocat", "awesome", "main", "README.json")
            .await
            .unwrap();

        assert_eq!(mock.call_count(), 3);
        assert!(start.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clones_share_the_limiter() {
        let mock = MockClient::default();
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(100)));
        let first = RateLimitedClient::new(mock.clone(), Arc::clone(&limiter));
        let second = first.clone();
        let start = Instant::now();

        let (a, b) = tokio::join!(
            first.list_issues_page("o", "r", &[], 1, 100),
            second.list_issues_page("o", "r", &[], 1, 100),
        );
        a.unwrap();
        b.unwrap();

        assert!(Arc::ptr_eq(first.limiter(), second.limiter()));
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_stopped_limiter_blocks_inner_calls() {
        let mock = MockClient::default();
        let limiter = Arc::new(RateLimiter::new(Duration::from_millis(10)));
        let client = RateLimitedClient::new(mock.clone(), Arc::clone(&limiter));

        limiter.stop().await;

        let issue = NewIssue {
            title: "t".to_string(),
            body: "b".to_string(),
            labels: vec![],
        };
        let err = client.create_issue("o", "r", &issue).await.unwrap_err();
        assert!(err.to_string().contains("rate limiter stopped"));
        assert_eq!(mock.call_count(), 0);
    }
}
