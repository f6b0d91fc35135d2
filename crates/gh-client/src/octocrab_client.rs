//! Octocrab-based GitHub API client
//!
//! Direct implementation of the `GitHubClient` trait. REST calls go through
//! octocrab; raw file checks go to the raw content host over plain reqwest,
//! since that host is not part of the API and needs no authentication.
//! This client makes real calls without any pacing.

use crate::client::{raw_content_url, GitHubClient};
use crate::types::{IssueSummary, NewIssue, SearchPage};
use crate::DEFAULT_RAW_HOST;
use anyhow::Context;
use async_trait::async_trait;
use log::debug;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Code search only ever serves the first 1000 hits of a query
pub const SEARCH_RESULT_LIMIT: u64 = 1000;

/// Direct GitHub API client using octocrab
///
/// This is the base implementation that makes actual API calls.
/// It can be wrapped by `RateLimitedClient` to add pacing.
#[derive(Debug, Clone)]
pub struct OctocrabClient {
    octocrab: Arc<Octocrab>,
    http: reqwest::Client,
    raw_host: String,
}

impl OctocrabClient {
    /// Create a new client with the given octocrab instance
    pub fn new(octocrab: Arc<Octocrab>) -> Self {
        Self {
            octocrab,
            http: reqwest::Client::new(),
            raw_host: DEFAULT_RAW_HOST.to_string(),
        }
    }

    /// Use a different host for raw file access (e.g., a GHE raw endpoint)
    pub fn with_raw_host(mut self, raw_host: impl Into<String>) -> Self {
        self.raw_host = raw_host.into();
        self
    }

    /// Get a reference to the underlying octocrab instance
    pub fn octocrab(&self) -> &Octocrab {
        &self.octocrab
    }

    /// Host used for raw file access
    pub fn raw_host(&self) -> &str {
        &self.raw_host
    }
}

#[derive(Debug, Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    per_page: u8,
    page: u32,
}

#[derive(Debug, Deserialize)]
struct CodeSearchResponse {
    total_count: u64,
    #[serde(default)]
    items: Vec<CodeSearchItem>,
}

#[derive(Debug, Deserialize)]
struct CodeSearchItem {
    repository: CodeSearchRepository,
}

#[derive(Debug, Deserialize)]
struct CodeSearchRepository {
    full_name: String,
}

#[async_trait]
impl GitHubClient for OctocrabClient {
    async fn search_code_page(
        &self,
        query: &str,
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<SearchPage> {
        debug!("Searching code (page {}, per_page {}): {}", page, per_page, query);

        let params = SearchParams {
            q: query,
            per_page,
            page,
        };
        let response: CodeSearchResponse = self
            .octocrab
            .get("/search/code", Some(&params))
            .await
            .with_context(|| format!("code search failed on page {}", page))?;

        Ok(convert_search_response(response))
    }

    async fn list_issues_page(
        &self,
        owner: &str,
        repo: &str,
        labels: &[String],
        page: u32,
        per_page: u8,
    ) -> anyhow::Result<Vec<IssueSummary>> {
        debug!(
            "Listing open issues for {}/{} (page {}, labels {:?})",
            owner, repo, page, labels
        );

        let issues = self
            .octocrab
            .issues(owner, repo)
            .list()
            .state(octocrab::params::State::Open)
            .labels(labels)
            .per_page(per_page)
            .page(page)
            .send()
            .await
            .with_context(|| format!("listing issues of {}/{} failed on page {}", owner, repo, page))?;

        Ok(issues
            .items
            .into_iter()
            .map(|issue| IssueSummary {
                number: issue.number,
                title: issue.title,
            })
            .collect())
    }

    async fn file_exists(&self, url: &str) -> anyhow::Result<bool> {
        debug!("HEAD {}", url);

        let response = self
            .http
            .head(url)
            .send()
            .await
            .with_context(|| format!("HEAD {} failed", url))?;

        Ok(response.status() == reqwest::StatusCode::OK)
    }

    async fn fetch_file_content(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        path: &str,
    ) -> anyhow::Result<String> {
        let url = raw_content_url(&self.raw_host, owner, repo, branch, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            anyhow::bail!("status {}", status.as_u16());
        }

        response
            .text()
            .await
            .with_context(|| format!("reading body of {} failed", url))
    }

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> anyhow::Result<u64> {
        debug!("Creating issue in {}/{}: {}", owner, repo, issue.title);

        let created = self
            .octocrab
            .issues(owner, repo)
            .create(&issue.title)
            .body(&issue.body)
            .labels(issue.labels.clone())
            .send()
            .await
            .with_context(|| format!("creating issue in {}/{} failed", owner, repo))?;

        Ok(created.number)
    }
}

/// Convert a code search response to our page type
fn convert_search_response(response: CodeSearchResponse) -> SearchPage {
    SearchPage {
        repositories: response
            .items
            .into_iter()
            .map(|item| item.repository.full_name)
            .collect(),
        total_count: response.total_count.min(SEARCH_RESULT_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_search_response() {
        let json = r#"{
            "total_count": 3,
            "incomplete_results": false,
            "items": [
                {"name": ".enhansome.jsonc", "repository": {"full_name": "octocat/awesome-a"}},
                {"name": ".enhansome.jsonc", "repository": {"full_name": "octocat/awesome-b"}},
                {"name": ".enhansome.jsonc", "repository": {"full_name": "octocat/awesome-a"}}
            ]
        }"#;
        let response: CodeSearchResponse = serde_json::from_str(json).unwrap();
        let page = convert_search_response(response);

        assert_eq!(page.total_count, 3);
        assert_eq!(
            page.repositories,
            vec!["octocat/awesome-a", "octocat/awesome-b", "octocat/awesome-a"]
        );
    }

    #[test]
    fn test_convert_search_response_clamps_total() {
        let json = r#"{"total_count": 48213, "items": []}"#;
        let response: CodeSearchResponse = serde_json::from_str(json).unwrap();
        let page = convert_search_response(response);

        assert_eq!(page.total_count, SEARCH_RESULT_LIMIT);
        assert!(page.repositories.is_empty());
    }

    #[test]
    fn test_search_params_serialize_as_query() {
        let params = SearchParams {
            q: "filename:.enhansome.jsonc",
            per_page: 100,
            page: 2,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["q"], "filename:.enhansome.jsonc");
        assert_eq!(json["per_page"], 100);
        assert_eq!(json["page"], 2);
    }
}
