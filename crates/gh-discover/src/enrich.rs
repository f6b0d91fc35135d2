//! Per-repository enrichment
//!
//! Decides whether a candidate is worth an issue and, if so, gathers the
//! metadata and configuration preview that go into it.

use crate::repository_id::RepositoryId;
use crate::result::{Enrichment, RepoMetadata, RepoResult, SkipReason};
use crate::tracked::TrackedSet;
use gh_client::{raw_content_url, GitHubClient};
use gh_discover_config::AppConfig;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Placeholder preview when the configuration file cannot be fetched
pub const EMPTY_CONFIG: &str = "{}";

/// Where to look for the files of a candidate repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichSettings {
    pub raw_host: String,
    pub branch: String,
    pub marker_file: String,
    pub config_file: String,
}

impl EnrichSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            raw_host: config.raw_host.clone(),
            branch: config.default_branch.clone(),
            marker_file: config.marker_file.clone(),
            config_file: config.config_file.clone(),
        }
    }
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

pub struct Enricher<C> {
    client: Arc<C>,
    tracked: Arc<TrackedSet>,
    settings: EnrichSettings,
    cancel: CancellationToken,
}

impl<C: GitHubClient> Enricher<C> {
    pub fn new(
        client: Arc<C>,
        tracked: Arc<TrackedSet>,
        settings: EnrichSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            tracked,
            settings,
            cancel,
        }
    }

    /// Run the checks and lookups for one repository
    ///
    /// Network calls happen only for untracked repositories, and the
    /// configuration and metadata are fetched only once the marker file is
    /// known to exist. Each call races the cancellation token, so a call
    /// still waiting for a rate limit permit is dropped before it is sent.
    pub async fn process(&self, repository: &RepositoryId) -> RepoResult {
        if self.tracked.contains(repository) {
            log::debug!("Skipping {} (already tracked)", repository);
            return skipped(SkipReason::AlreadyTracked);
        }

        let marker_url = raw_content_url(
            &self.settings.raw_host,
            repository.owner(),
            repository.name(),
            &self.settings.branch,
            &self.settings.marker_file,
        );
        let Some(exists) = self.unless_cancelled(self.client.file_exists(&marker_url)).await else {
            return skipped(SkipReason::Cancelled);
        };
        match exists {
            Ok(true) => {}
            Ok(false) => {
                log::debug!("Skipping {} ({} not found)", repository, self.settings.marker_file);
                return skipped(SkipReason::MarkerMissing {
                    marker_file: self.settings.marker_file.clone(),
                });
            }
            Err(e) => {
                return RepoResult::Failed {
                    error: format!("checking {}: {:#}", self.settings.marker_file, e),
                };
            }
        }

        let Some(config_content) = self.fetch_config(repository).await else {
            return skipped(SkipReason::Cancelled);
        };
        let Some(metadata) = self.fetch_metadata(repository).await else {
            return skipped(SkipReason::Cancelled);
        };

        RepoResult::Enriched(Enrichment {
            metadata,
            config_content,
        })
    }

    /// `None` when the token fires before `call` completes
    async fn unless_cancelled<T>(&self, call: impl Future<Output = T>) -> Option<T> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = call => Some(result),
        }
    }

    async fn fetch_config(&self, repository: &RepositoryId) -> Option<String> {
        let content = match self.fetch(repository, &self.settings.config_file).await? {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "Failed to fetch {} for {}: {:#}",
                    self.settings.config_file,
                    repository,
                    e
                );
                EMPTY_CONFIG.to_string()
            }
        };
        Some(content)
    }

    async fn fetch_metadata(&self, repository: &RepositoryId) -> Option<RepoMetadata> {
        let content = match self.fetch(repository, &self.settings.marker_file).await? {
            Ok(content) => content,
            Err(e) => {
                log::warn!(
                    "Failed to fetch {} for {}: {:#}",
                    self.settings.marker_file,
                    repository,
                    e
                );
                return Some(RepoMetadata::default());
            }
        };

        let metadata = RepoMetadata::from_marker_json(&content).unwrap_or_else(|e| {
            log::warn!(
                "Invalid {} in {}: {}",
                self.settings.marker_file,
                repository,
                e
            );
            RepoMetadata::default()
        });
        Some(metadata)
    }

    async fn fetch(
        &self,
        repository: &RepositoryId,
        path: &str,
    ) -> Option<anyhow::Result<String>> {
        self.unless_cancelled(self.client.fetch_file_content(
            repository.owner(),
            repository.name(),
            &self.settings.branch,
            path,
        ))
        .await
    }
}

fn skipped(reason: SkipReason) -> RepoResult {
    RepoResult::Skipped { reason }
}
