//! Allow/deny list files
//!
//! One entry per line. Blank lines and lines starting with `#` are ignored,
//! surrounding whitespace is trimmed. Entries are returned verbatim; turning
//! them into repository identifiers is up to the caller.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;

/// Extract the meaningful lines of a list file
pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Load a list file that must exist
pub fn load_list_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read list file {}", path.display()))?;
    let entries = parse_list(&content);
    log::debug!("Loaded {} entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Load a list file that may be absent
///
/// A missing file yields an empty list; any other read failure is an error.
pub fn load_optional_list_file(path: &Path) -> Result<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let entries = parse_list(&content);
            log::debug!("Loaded {} entries from {}", entries.len(), path.display());
            Ok(entries)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No list file at {}, using an empty list", path.display());
            Ok(Vec::new())
        }
        Err(e) => {
            Err(e).with_context(|| format!("Failed to read list file {}", path.display()))
        }
    }
}
