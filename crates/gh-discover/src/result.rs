//! Per-repository work items and their outcomes

use crate::repository_id::RepositoryId;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// A repository queued for enrichment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTask {
    pub repository: RepositoryId,
}

/// Why a repository was left alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// An open tracking issue already exists
    AlreadyTracked,
    /// The marker file is not on the default branch
    MarkerMissing { marker_file: String },
    /// The run was cancelled before the repository was processed
    Cancelled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyTracked => f.write_str("already tracked"),
            Self::MarkerMissing { marker_file } => write!(f, "{} not found", marker_file),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Descriptive fields from the marker file
///
/// Missing or malformed metadata is not an error; each field falls back to
/// empty on its own, so one badly typed value does not hide the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepoMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub awesome_list_name: String,
}

#[derive(Deserialize)]
struct MarkerDocument {
    #[serde(default, deserialize_with = "lenient_metadata")]
    metadata: RepoMetadata,
}

/// Strings pass through; null, numbers and the like become empty
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        _ => Ok(String::new()),
    }
}

fn lenient_metadata<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RepoMetadata, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(RepoMetadata::deserialize(value).unwrap_or_default())
}

impl RepoMetadata {
    /// Parse the `metadata` object of a marker document
    ///
    /// Only a document that is not JSON at all is an error.
    pub fn from_marker_json(content: &str) -> serde_json::Result<Self> {
        let document: MarkerDocument = serde_json::from_str(content)?;
        Ok(document.metadata)
    }
}

/// Everything needed to write a tracking issue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub metadata: RepoMetadata,
    /// Raw discovery configuration, `{}` when it could not be fetched
    pub config_content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoResult {
    Skipped { reason: SkipReason },
    Failed { error: String },
    Enriched(Enrichment),
}

/// A result tagged with the repository it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOutcome {
    pub repository: RepositoryId,
    pub result: RepoResult,
}
