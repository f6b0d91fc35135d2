//! End-to-end discovery run
//!
//! search ─► allow/deny filter ─► tracked issues ─► worker pool ─► publisher
//!
//! Search and tracked-issue failures abort the run. Everything after that
//! point is per repository and only shows up in the summary.

use crate::enrich::{EnrichSettings, Enricher};
use crate::error::DiscoveryError;
use crate::issue::IssueTemplate;
use crate::list_filter::ListFilter;
use crate::pagination::{collect_pages, Page};
use crate::publisher::{IssuePublisher, PublishSummary};
use crate::repository_id::RepositoryId;
use crate::tracked::TrackedSet;
use crate::worker_pool::{resolve_worker_count, WorkerPool};
use gh_client::{GitHubClient, RateLimiter};
use gh_discover_config::AppConfig;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Run parameters
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Repository that receives the tracking issues
    pub tracker: RepositoryId,
    pub dry_run: bool,
    pub workers: usize,
    pub per_page: u8,
    pub search_query: String,
    pub tracking_label: String,
    pub files: EnrichSettings,
    pub template: IssueTemplate,
}

impl DiscoveryOptions {
    pub fn from_config(config: &AppConfig, tracker: RepositoryId) -> Self {
        Self {
            tracker,
            dry_run: false,
            workers: resolve_worker_count(config.workers),
            per_page: config.effective_per_page(),
            search_query: config.search_query.clone(),
            tracking_label: config.tracking_label.clone(),
            files: EnrichSettings::from_config(config),
            template: IssueTemplate::from_config(config),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct repositories returned by the search
    pub found: usize,
    /// Repositories left after the allow/deny filter
    pub new: usize,
    /// Open tracking issues on the tracker repository
    pub tracked: usize,
    pub publish: PublishSummary,
}

pub struct Discoverer<C> {
    client: Arc<C>,
    limiter: Arc<RateLimiter>,
    filter: ListFilter,
    options: DiscoveryOptions,
    cancel: CancellationToken,
}

impl<C: GitHubClient + 'static> Discoverer<C> {
    /// `limiter` is the one `client` draws permits from; it is stopped when
    /// the run ends.
    pub fn new(
        client: Arc<C>,
        limiter: Arc<RateLimiter>,
        filter: ListFilter,
        options: DiscoveryOptions,
    ) -> Self {
        Self {
            client,
            limiter,
            filter,
            options,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Execute one discovery run
    ///
    /// The rate limiter is stopped on every exit path.
    pub async fn run(&self) -> Result<RunSummary, DiscoveryError> {
        let result = self.run_pipeline().await;
        self.limiter.stop().await;
        result
    }

    async fn run_pipeline(&self) -> Result<RunSummary, DiscoveryError> {
        let mut summary = RunSummary::default();

        log::info!("Searching for repositories: {}", self.options.search_query);
        let found = self.search_repositories().await?;
        summary.found = found.len();
        log::info!("Found {} repositories", summary.found);

        let new = self.filter.retain_new(found);
        summary.new = new.len();
        log::info!("{} repositories are not on the allow/deny lists", summary.new);

        if new.is_empty() {
            log::info!("No new repositories to process");
            return Ok(summary);
        }

        let tracked = Arc::new(self.tracked_repositories().await?);
        summary.tracked = tracked.len();
        log::info!("Found {} existing tracking issues", summary.tracked);

        let enricher = Enricher::new(
            Arc::clone(&self.client),
            Arc::clone(&tracked),
            self.options.files.clone(),
            self.cancel.clone(),
        );
        let results = WorkerPool::new(enricher, self.options.workers).spawn(new);

        let mut publisher = IssuePublisher::new(
            Arc::clone(&self.client),
            self.options.tracker.clone(),
            self.options.template.clone(),
            tracked,
        )
        .with_dry_run(self.options.dry_run)
        .with_cancellation(self.cancel.clone());
        summary.publish = publisher.publish(results).await;

        log_summary(&summary, self.options.dry_run);
        Ok(summary)
    }

    async fn search_repositories(&self) -> Result<HashSet<RepositoryId>, DiscoveryError> {
        let query = self.options.search_query.as_str();
        let client = self.client.as_ref();
        let cancel = &self.cancel;

        let names = collect_pages(self.options.per_page, |page, per_page| async move {
            if cancel.is_cancelled() {
                return Err(DiscoveryError::Cancelled);
            }
            let result = client
                .search_code_page(query, page, per_page)
                .await
                .map_err(|source| DiscoveryError::Search { source })?;
            Ok::<_, DiscoveryError>(Page::with_total(result.repositories, result.total_count))
        })
        .await?;

        Ok(names
            .into_iter()
            .filter_map(|name| match RepositoryId::parse(&name) {
                Ok(repository) => Some(repository),
                Err(e) => {
                    log::warn!("Ignoring search result: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn tracked_repositories(&self) -> Result<TrackedSet, DiscoveryError> {
        let tracker = &self.options.tracker;
        let labels = std::slice::from_ref(&self.options.tracking_label);
        let client = self.client.as_ref();
        let cancel = &self.cancel;

        let titles = collect_pages(self.options.per_page, |page, per_page| async move {
            if cancel.is_cancelled() {
                return Err(DiscoveryError::Cancelled);
            }
            let issues = client
                .list_issues_page(tracker.owner(), tracker.name(), labels, page, per_page)
                .await
                .map_err(|source| DiscoveryError::TrackedIssues { source })?;
            Ok::<_, DiscoveryError>(Page::new(
                issues.into_iter().map(|issue| issue.title).collect::<Vec<String>>(),
            ))
        })
        .await?;

        Ok(TrackedSet::from_titles(titles))
    }
}

fn log_summary(summary: &RunSummary, dry_run: bool) {
    let publish = &summary.publish;
    log::info!(
        "Discovery complete: {} found, {} new, {} already tracked, {} skipped, {} failed",
        summary.found,
        summary.new,
        publish.already_tracked,
        publish.skipped,
        publish.failed
    );
    if dry_run {
        log::info!("[DRY RUN] {} issues would be created", publish.would_create);
    } else {
        log::info!(
            "{} issues created, {} failed to create",
            publish.created,
            publish.create_failed
        );
    }
    if publish.cancelled > 0 {
        log::warn!("{} repositories not processed due to cancellation", publish.cancelled);
    }
}
