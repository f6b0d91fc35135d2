//! Repository identifiers
//!
//! Everything in the pipeline keys on `owner/name`. List files may carry
//! longer paths (`owner/name/README.json`), which are cut down to the first
//! two segments before comparison.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid repository identifier '{0}', expected owner/name")]
pub struct InvalidRepositoryId(pub String);

/// A repository in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryId {
    full_name: String,
    slash: usize,
}

impl RepositoryId {
    /// Parse a strict `owner/name` identifier
    pub fn parse(value: &str) -> Result<Self, InvalidRepositoryId> {
        let value = value.trim();
        let invalid = || InvalidRepositoryId(value.to_string());

        let (owner, name) = value.split_once('/').ok_or_else(invalid)?;
        if !is_segment(owner) || !is_segment(name) {
            return Err(invalid());
        }

        Ok(Self {
            full_name: value.to_string(),
            slash: owner.len(),
        })
    }

    /// Normalize an allow/deny list entry
    ///
    /// Keeps the first two path segments, so `owner/name/README.json` and
    /// `owner/name` name the same repository. Returns `None` for entries with
    /// fewer than two segments.
    pub fn from_list_entry(entry: &str) -> Option<Self> {
        let mut segments = entry.trim().trim_matches('/').split('/');
        let owner = segments.next()?;
        let name = segments.next()?;
        Self::parse(&format!("{}/{}", owner, name)).ok()
    }

    pub fn owner(&self) -> &str {
        &self.full_name[..self.slash]
    }

    pub fn name(&self) -> &str {
        &self.full_name[self.slash + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.full_name
    }
}

fn is_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('/') && !segment.chars().any(char::is_whitespace)
}

impl fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

impl FromStr for RepositoryId {
    type Err = InvalidRepositoryId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
