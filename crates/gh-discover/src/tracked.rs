//! Repositories that already have a tracking issue
//!
//! Tracking issues are recognised by title: `Auto-Discovery: owner/name`.

use crate::repository_id::RepositoryId;
use std::collections::HashSet;

pub const TRACKING_TITLE_PREFIX: &str = "Auto-Discovery: ";

/// Title of the tracking issue for a repository
pub fn issue_title(repository: &RepositoryId) -> String {
    format!("{}{}", TRACKING_TITLE_PREFIX, repository)
}

/// Recover the repository from a tracking issue title
pub fn tracked_repository(title: &str) -> Option<RepositoryId> {
    let rest = title.strip_prefix(TRACKING_TITLE_PREFIX)?;
    RepositoryId::parse(rest).ok()
}

/// Set of repositories with an open tracking issue
#[derive(Debug, Clone, Default)]
pub struct TrackedSet {
    repositories: HashSet<RepositoryId>,
}

impl TrackedSet {
    /// Build the set from issue titles, ignoring titles that don't match
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let repositories = titles
            .into_iter()
            .filter_map(|title| {
                let title = title.as_ref();
                let repository = tracked_repository(title);
                if repository.is_none() {
                    log::debug!("Ignoring issue without tracking title: {}", title);
                }
                repository
            })
            .collect();
        Self { repositories }
    }

    pub fn contains(&self, repository: &RepositoryId) -> bool {
        self.repositories.contains(repository)
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}
