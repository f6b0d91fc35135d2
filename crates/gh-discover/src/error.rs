use crate::repository_id::InvalidRepositoryId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a discovery run
///
/// Per-repository problems never show up here; they are reported as
/// [`crate::RepoResult::Failed`] and the run carries on.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("loading allowlist {}", .path.display())]
    AllowList {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("loading denylist {}", .path.display())]
    DenyList {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("searching repositories")]
    Search {
        #[source]
        source: anyhow::Error,
    },

    #[error("getting existing issues")]
    TrackedIssues {
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid tracking repository")]
    InvalidTracker(#[from] InvalidRepositoryId),

    #[error("discovery cancelled")]
    Cancelled,
}
