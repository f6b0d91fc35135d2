//! Consumes enrichment results and files tracking issues

use crate::issue::IssueTemplate;
use crate::repository_id::RepositoryId;
use crate::result::{Enrichment, RepoOutcome, RepoResult, SkipReason};
use crate::tracked::TrackedSet;
use gh_client::GitHubClient;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Per-run tallies of what happened to each result
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishSummary {
    pub already_tracked: usize,
    pub skipped: usize,
    pub cancelled: usize,
    pub failed: usize,
    pub created: usize,
    pub would_create: usize,
    pub create_failed: usize,
}

impl PublishSummary {
    pub fn total(&self) -> usize {
        self.already_tracked
            + self.skipped
            + self.cancelled
            + self.failed
            + self.created
            + self.would_create
            + self.create_failed
    }
}

pub struct IssuePublisher<C> {
    client: Arc<C>,
    tracker: RepositoryId,
    template: IssueTemplate,
    tracked: Arc<TrackedSet>,
    dry_run: bool,
    cancel: CancellationToken,
    published: HashSet<RepositoryId>,
}

impl<C: GitHubClient> IssuePublisher<C> {
    /// Publisher filing issues on `tracker`
    pub fn new(
        client: Arc<C>,
        tracker: RepositoryId,
        template: IssueTemplate,
        tracked: Arc<TrackedSet>,
    ) -> Self {
        Self {
            client,
            tracker,
            template,
            tracked,
            dry_run: false,
            cancel: CancellationToken::new(),
            published: HashSet::new(),
        }
    }

    /// Log instead of creating issues
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Drain the result stream until every worker is done
    pub async fn publish(&mut self, mut results: mpsc::Receiver<RepoOutcome>) -> PublishSummary {
        let mut summary = PublishSummary::default();
        while let Some(outcome) = results.recv().await {
            self.handle(outcome, &mut summary).await;
        }
        summary
    }

    async fn handle(&mut self, outcome: RepoOutcome, summary: &mut PublishSummary) {
        let RepoOutcome { repository, result } = outcome;
        match result {
            RepoResult::Skipped { reason } => {
                log::info!("Skipped {}: {}", repository, reason);
                match reason {
                    SkipReason::AlreadyTracked => summary.already_tracked += 1,
                    SkipReason::Cancelled => summary.cancelled += 1,
                    SkipReason::MarkerMissing { .. } => summary.skipped += 1,
                }
            }
            RepoResult::Failed { error } => {
                log::warn!("Failed to process {}: {}", repository, error);
                summary.failed += 1;
            }
            RepoResult::Enriched(enrichment) => {
                self.publish_one(repository, &enrichment, summary).await;
            }
        }
    }

    async fn publish_one(
        &mut self,
        repository: RepositoryId,
        enrichment: &Enrichment,
        summary: &mut PublishSummary,
    ) {
        if self.tracked.contains(&repository) || self.published.contains(&repository) {
            log::info!("Skipped {}: already tracked", repository);
            summary.already_tracked += 1;
            return;
        }

        let issue = self.template.render(&repository, enrichment);

        if self.dry_run {
            log::info!("[DRY RUN] Would create issue: {}", issue.title);
            log::debug!("[DRY RUN] Issue body:\n{}", issue.body);
            self.published.insert(repository);
            summary.would_create += 1;
            return;
        }

        if self.cancel.is_cancelled() {
            log::info!("Not creating issue for {}: cancelled", repository);
            summary.cancelled += 1;
            return;
        }

        match self
            .client
            .create_issue(self.tracker.owner(), self.tracker.name(), &issue)
            .await
        {
            Ok(number) => {
                log::info!("Created issue #{}: {}", number, issue.title);
                self.published.insert(repository);
                summary.created += 1;
            }
            Err(e) => {
                log::error!("Failed to create issue for {}: {:#}", repository, e);
                summary.create_failed += 1;
            }
        }
    }
}
