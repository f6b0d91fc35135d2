//! Repository auto-discovery
//!
//! Finds repositories carrying a discovery configuration, drops the ones
//! already reviewed (allow/deny lists) or already tracked (open issues), and
//! files one review issue per remaining repository that has a marker file.
//!
//! # Pipeline
//!
//! ```text
//! code search (paginated, deduplicated)
//!        │
//!        ▼
//! ListFilter ──► nothing new? stop
//!        │
//!        ▼
//! TrackedSet (paginated issue listing)
//!        │
//!        ▼
//! WorkerPool ──► Enricher: tracked? marker? config + metadata
//!        │
//!        ▼
//! IssuePublisher (dry-run aware) ──► RunSummary
//! ```
//!
//! Every network call goes through a [`gh_client::GitHubClient`]; wrap the
//! client in a [`gh_client::RateLimitedClient`] to pace them.

pub mod discoverer;
pub mod enrich;
pub mod error;
pub mod issue;
pub mod list_filter;
pub mod pagination;
pub mod publisher;
pub mod repository_id;
pub mod result;
pub mod tracked;
pub mod worker_pool;

#[cfg(test)]
mod test_support;

pub use discoverer::{Discoverer, DiscoveryOptions, RunSummary};
pub use enrich::{EnrichSettings, Enricher};
pub use error::DiscoveryError;
pub use issue::IssueTemplate;
pub use list_filter::{FilterDecision, ListFilter};
pub use pagination::{collect_pages, Page};
pub use publisher::{IssuePublisher, PublishSummary};
pub use repository_id::{InvalidRepositoryId, RepositoryId};
pub use result::{Enrichment, RepoMetadata, RepoOutcome, RepoResult, RepoTask, SkipReason};
pub use tracked::{issue_title, TrackedSet, TRACKING_TITLE_PREFIX};
pub use worker_pool::{resolve_worker_count, WorkerPool, DEFAULT_WORKERS};
