//! Bounded pool of enrichment workers
//!
//! All tasks are queued up front on a channel sized to hold them, then N
//! workers pull from the shared receiver until it drains. A supervisor task
//! waits for every worker before dropping the last result sender, so the
//! result stream closes exactly once, after the final result.
//!
//! ```text
//!   tasks ──► [ Mutex<Receiver<RepoTask>> ] ──► worker 0..N ──► results
//!                                                    │
//!                                            Enricher::process
//! ```

use crate::enrich::Enricher;
use crate::repository_id::RepositoryId;
use crate::result::{RepoOutcome, RepoTask};
use gh_client::GitHubClient;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

pub const DEFAULT_WORKERS: usize = 5;

/// Map a configured worker count to a usable one
///
/// Zero or negative falls back to [`DEFAULT_WORKERS`].
pub fn resolve_worker_count(configured: i64) -> usize {
    if configured <= 0 {
        DEFAULT_WORKERS
    } else {
        usize::try_from(configured).unwrap_or(DEFAULT_WORKERS)
    }
}

pub struct WorkerPool<C> {
    enricher: Arc<Enricher<C>>,
    workers: usize,
}

impl<C: GitHubClient + 'static> WorkerPool<C> {
    pub fn new(enricher: Enricher<C>, workers: usize) -> Self {
        Self {
            enricher: Arc::new(enricher),
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Start processing and return the stream of results
    ///
    /// Exactly one outcome is produced per repository, in completion order.
    /// The receiver yields `None` once every worker has finished.
    pub fn spawn(&self, repositories: Vec<RepositoryId>) -> mpsc::Receiver<RepoOutcome> {
        let capacity = repositories.len().max(1);
        let (task_tx, task_rx) = mpsc::channel::<RepoTask>(capacity);
        let (result_tx, result_rx) = mpsc::channel::<RepoOutcome>(capacity);

        log::info!(
            "Processing {} repositories with {} workers",
            repositories.len(),
            self.workers
        );

        for repository in repositories {
            if let Err(e) = task_tx.try_send(RepoTask { repository }) {
                // Capacity covers every task, so this only fires on a bug
                log::error!("Failed to queue task: {}", e);
            }
        }
        drop(task_tx);

        let tasks = Arc::new(Mutex::new(task_rx));
        let handles: Vec<_> = (0..self.workers)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    Arc::clone(&tasks),
                    result_tx.clone(),
                    Arc::clone(&self.enricher),
                ))
            })
            .collect();

        tokio::spawn(async move {
            for handle in handles {
                if let Err(e) = handle.await {
                    log::error!("Worker task panicked: {}", e);
                }
            }
            drop(result_tx);
            log::debug!("All workers finished");
        });

        result_rx
    }
}

async fn run_worker<C: GitHubClient>(
    worker_id: usize,
    tasks: Arc<Mutex<mpsc::Receiver<RepoTask>>>,
    results: mpsc::Sender<RepoOutcome>,
    enricher: Arc<Enricher<C>>,
) {
    loop {
        let task = tasks.lock().await.recv().await;
        let Some(RepoTask { repository }) = task else {
            break;
        };

        log::debug!("Worker {} processing {}", worker_id, repository);
        let result = enricher.process(&repository).await;

        if results.send(RepoOutcome { repository, result }).await.is_err() {
            log::warn!("Result stream closed, worker {} stopping", worker_id);
            break;
        }
    }
}
