//! Allowlist / denylist filtering
//!
//! Repositories on either list have already been reviewed and never get a
//! new tracking issue. The allowlist is checked first so a repository on
//! both lists is reported as allowed.

use crate::error::DiscoveryError;
use crate::repository_id::RepositoryId;
use gh_discover_config::{load_list_file, load_optional_list_file};
use std::collections::HashSet;
use std::path::Path;

/// Outcome of checking one repository against the lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    Keep,
    Allowed,
    Denied,
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    allow: HashSet<RepositoryId>,
    deny: HashSet<RepositoryId>,
}

impl ListFilter {
    pub fn new(
        allow: impl IntoIterator<Item = RepositoryId>,
        deny: impl IntoIterator<Item = RepositoryId>,
    ) -> Self {
        Self {
            allow: allow.into_iter().collect(),
            deny: deny.into_iter().collect(),
        }
    }

    /// Build from raw list entries, normalizing each to `owner/name`
    pub fn from_entries<S: AsRef<str>>(allow: &[S], deny: &[S]) -> Self {
        Self::new(normalize(allow), normalize(deny))
    }

    /// Load both list files
    ///
    /// The allowlist must exist; a missing denylist counts as empty.
    pub fn load(allow_path: &Path, deny_path: &Path) -> Result<Self, DiscoveryError> {
        let allow = load_list_file(allow_path).map_err(|source| DiscoveryError::AllowList {
            path: allow_path.to_path_buf(),
            source,
        })?;
        let deny =
            load_optional_list_file(deny_path).map_err(|source| DiscoveryError::DenyList {
                path: deny_path.to_path_buf(),
                source,
            })?;

        let filter = Self::from_entries(&allow, &deny);
        log::info!(
            "Loaded {} allowlisted and {} denylisted repositories",
            filter.allow.len(),
            filter.deny.len()
        );
        Ok(filter)
    }

    pub fn classify(&self, repository: &RepositoryId) -> FilterDecision {
        if self.allow.contains(repository) {
            FilterDecision::Allowed
        } else if self.deny.contains(repository) {
            FilterDecision::Denied
        } else {
            FilterDecision::Keep
        }
    }

    /// Keep the repositories on neither list, in sorted order
    pub fn retain_new(&self, repositories: impl IntoIterator<Item = RepositoryId>) -> Vec<RepositoryId> {
        let mut kept: Vec<RepositoryId> = repositories
            .into_iter()
            .filter(|repository| match self.classify(repository) {
                FilterDecision::Keep => true,
                FilterDecision::Allowed => {
                    log::info!("Skipping {} (already in allowlist)", repository);
                    false
                }
                FilterDecision::Denied => {
                    log::info!("Skipping {} (in denylist)", repository);
                    false
                }
            })
            .collect();
        kept.sort();
        kept
    }
}

fn normalize<S: AsRef<str>>(entries: &[S]) -> HashSet<RepositoryId> {
    entries
        .iter()
        .filter_map(|entry| {
            let entry = entry.as_ref();
            let repository = RepositoryId::from_list_entry(entry);
            if repository.is_none() {
                log::warn!("Ignoring malformed list entry: {}", entry);
            }
            repository
        })
        .collect()
}
