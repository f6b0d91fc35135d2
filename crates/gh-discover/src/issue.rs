//! Tracking issue rendering

use crate::enrich::EnrichSettings;
use crate::repository_id::RepositoryId;
use crate::result::Enrichment;
use crate::tracked::issue_title;
use gh_client::NewIssue;
use gh_discover_config::AppConfig;

const UNKNOWN_LIST_NAME: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description available";

/// Static parts of every tracking issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTemplate {
    pub branch: String,
    pub marker_file: String,
    pub config_file: String,
    pub labels: Vec<String>,
}

impl IssueTemplate {
    pub fn from_config(config: &AppConfig) -> Self {
        let files = EnrichSettings::from_config(config);
        Self {
            branch: files.branch,
            marker_file: files.marker_file,
            config_file: files.config_file,
            labels: config.issue_labels(),
        }
    }

    /// Build the issue for an enriched repository
    pub fn render(&self, repository: &RepositoryId, enrichment: &Enrichment) -> NewIssue {
        NewIssue {
            title: issue_title(repository),
            body: self.body(repository, enrichment),
            labels: self.labels.clone(),
        }
    }

    fn body(&self, repository: &RepositoryId, enrichment: &Enrichment) -> String {
        let list_name = non_empty_or(&enrichment.metadata.awesome_list_name, UNKNOWN_LIST_NAME);
        let description = non_empty_or(&enrichment.metadata.description, NO_DESCRIPTION);
        let blob = format!("https://github.com/{}/blob/{}", repository, self.branch);

        format!(
            "## Auto-Discovery: {repo}

A new repository with Enhansome configuration has been discovered!

### Repository Information
- **Repository:** https://github.com/{repo}
- **Awesome List Name:** {list_name}
- **Description:** {description}
- **{marker}:** [View file]({blob}/{marker})
- **Configuration:** [View {config}]({blob}/{config})

### Configuration Preview
```jsonc
{config_content}
```

### Action Required
Please review this repository and decide:

1. **✅ Approve:** Add `{repo}/{marker}` to `allowlist.txt`
2. **❌ Reject:** Add `{repo}` to `denylist.txt`
3. **⏸️  Defer:** Close this issue to review later

See [MAINTAINING.md](./MAINTAINING.md) for detailed instructions.

---
*This issue was automatically created by the auto-discovery workflow.*
",
            repo = repository,
            list_name = list_name,
            description = description,
            marker = self.marker_file,
            config = self.config_file,
            blob = blob,
            config_content = enrichment.config_content,
        )
    }
}

impl Default for IssueTemplate {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
