//! GitHub API data transfer objects
//!
//! These types represent the data exchanged with the GitHub API.
//! They are intentionally separate from the discovery domain models
//! to keep this crate pure and reusable.

use serde::{Deserialize, Serialize};

/// One page of code search results, reduced to the owning repositories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// `owner/name` of the repository for each hit, in API order
    ///
    /// A repository appears once per matching file, so duplicates are possible.
    pub repositories: Vec<String>,

    /// Total number of hits reported by the API (clamped to what search serves)
    pub total_count: u64,
}

/// An issue as returned by the issue list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    /// Issue number
    pub number: u64,

    /// Issue title
    pub title: String,
}

/// Payload for opening a new issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    /// Issue title
    pub title: String,

    /// Markdown body
    pub body: String,

    /// Labels applied at creation
    pub labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_issue_serializes_github_shape() {
        let issue = NewIssue {
            title: "Auto-Discovery: octocat/awesome".to_string(),
            body: "body".to_string(),
            labels: vec!["auto-discovery".to_string()],
        };

        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["title"], "Auto-Discovery: octocat/awesome");
        assert_eq!(json["labels"][0], "auto-discovery");
    }

    #[test]
    fn test_search_page_default_is_empty() {
        let page = SearchPage::default();
        assert!(page.repositories.is_empty());
        assert_eq!(page.total_count, 0);
    }
}
