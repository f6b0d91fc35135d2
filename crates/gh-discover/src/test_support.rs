//! Scripted in-memory GitHub client for pipeline tests

use async_trait::async_trait;
use gh_client::{GitHubClient, IssueSummary, NewIssue, SearchPage};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Search { page: u32 },
    ListIssues { page: u32, labels: Vec<String> },
    FileExists { url: String },
    FetchFile { repository: String, path: String },
    CreateIssue { owner: String, repo: String, title: String },
}

impl Call {
    /// Whether this call targets the given `owner/name`
    fn touches(&self, repository: &str) -> bool {
        match self {
            Call::FileExists { url } => url.contains(&format!("/{}/", repository)),
            Call::FetchFile { repository: r, .. } => r == repository,
            Call::CreateIssue { title, .. } => title.ends_with(repository),
            Call::Search { .. } | Call::ListIssues { .. } => false,
        }
    }
}

#[derive(Default)]
pub(crate) struct MockClient {
    search_pages: Vec<Result<SearchPage, String>>,
    issue_pages: Vec<Result<Vec<String>, String>>,
    missing_markers: HashSet<String>,
    unreachable: HashSet<String>,
    files: HashMap<(String, String), String>,
    failing_creates: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
    created: Mutex<Vec<NewIssue>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    next_issue: AtomicU64,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            next_issue: AtomicU64::new(1),
            ..Default::default()
        }
    }

    pub fn with_search_page(mut self, repositories: &[&str], total_count: u64) -> Self {
        self.search_pages.push(Ok(SearchPage {
            repositories: repositories.iter().map(|r| r.to_string()).collect(),
            total_count,
        }));
        self
    }

    pub fn with_search_error(mut self, message: &str) -> Self {
        self.search_pages.push(Err(message.to_string()));
        self
    }

    pub fn with_issue_page(mut self, titles: &[&str]) -> Self {
        self.issue_pages
            .push(Ok(titles.iter().map(|t| t.to_string()).collect()));
        self
    }

    pub fn with_issue_error(mut self, message: &str) -> Self {
        self.issue_pages.push(Err(message.to_string()));
        self
    }

    pub fn with_missing_marker(mut self, repository: &str) -> Self {
        self.missing_markers.insert(repository.to_string());
        self
    }

    pub fn with_unreachable(mut self, repository: &str) -> Self {
        self.unreachable.insert(repository.to_string());
        self
    }

    pub fn with_file(mut self, repository: &str, path: &str, content: &str) -> Self {
        self.files
            .insert((repository.to_string(), path.to_string()), content.to_string());
        self
    }

    pub fn with_failing_create(mut self, repository: &str) -> Self {
        self.failing_creates.insert(repository.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, repository: &str) -> usize {
        self.calls().iter().filter(|c| c.touches(repository)).count()
    }

    pub fn search_calls(&self) -> Vec<u32> {
        self.calls()
            .iter()
            .filter_map(|c| match c {
                Call::Search { page } => Some(*page),
                _ => None,
            })
            .collect()
    }

    pub fn list_issue_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::ListIssues { .. }))
            .count()
    }

    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateIssue { .. }))
            .count()
    }

    pub fn created(&self) -> Vec<NewIssue> {
        self.created.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// `https://host/owner/name/branch/path` -> `owner/name`
fn repository_from_url(url: &str) -> String {
    let path = url.split("://").nth(1).unwrap_or(url);
    path.split('/').skip(1).take(2).collect::<Vec<_>>().join("/")
}

#[async_trait]
impl GitHubClient for MockClient {
    async fn search_code_page(
        &self,
        _query: &str,
        page: u32,
        _per_page: u8,
    ) -> anyhow::Result<SearchPage> {
        self.record(Call::Search { page });
        match self.search_pages.get(page as usize - 1) {
            Some(Ok(result)) => Ok(result.clone()),
            Some(Err(message)) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(SearchPage::default()),
        }
    }

    async fn list_issues_page(
        &self,
        _owner: &str,
        _repo: &str,
        labels: &[String],
        page: u32,
        _per_page: u8,
    ) -> anyhow::Result<Vec<IssueSummary>> {
        self.record(Call::ListIssues {
            page,
            labels: labels.to_vec(),
        });
        match self.issue_pages.get(page as usize - 1) {
            Some(Ok(titles)) => Ok(titles
                .iter()
                .enumerate()
                .map(|(i, title)| IssueSummary {
                    number: i as u64 + 1,
                    title: title.clone(),
                })
                .collect()),
            Some(Err(message)) => Err(anyhow::anyhow!("{}", message)),
            None => Ok(Vec::new()),
        }
    }

    async fn file_exists(&self, url: &str) -> anyhow::Result<bool> {
        self.record(Call::FileExists {
            url: url.to_string(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let repository = repository_from_url(url);
        if self.unreachable.contains(&repository) {
            anyhow::bail!("connection reset");
        }
        Ok(!self.missing_markers.contains(&repository))
    }

    async fn fetch_file_content(
        &self,
        owner: &str,
        repo: &str,
        _branch: &str,
        path: &str,
    ) -> anyhow::Result<String> {
        let repository = format!("{}/{}", owner, repo);
        self.record(Call::FetchFile {
            repository: repository.clone(),
            path: path.to_string(),
        });
        self.files
            .get(&(repository, path.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("status 404 Not Found"))
    }

    async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> anyhow::Result<u64> {
        self.record(Call::CreateIssue {
            owner: owner.to_string(),
            repo: repo.to_string(),
            title: issue.title.clone(),
        });
        if self
            .failing_creates
            .iter()
            .any(|r| issue.title.ends_with(r.as_str()))
        {
            anyhow::bail!("validation failed");
        }
        self.created.lock().unwrap().push(issue.clone());
        Ok(self.next_issue.fetch_add(1, Ordering::SeqCst))
    }
}

/// Process-wide logger that keeps every record for later inspection
///
/// Tests share it, so assertions should match on messages unique to the test.
struct CaptureLogger {
    records: Mutex<Vec<(log::Level, String)>>,
}

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

pub(crate) fn capture_logs() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(log::LevelFilter::Trace);
    });
}

/// Level of the first captured record equal to `message`
pub(crate) fn logged_level(message: &str) -> Option<log::Level> {
    CAPTURE
        .records
        .lock()
        .unwrap()
        .iter()
        .find(|(_, text)| text == message)
        .map(|(level, _)| *level)
}
