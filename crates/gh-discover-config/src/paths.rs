//! Configuration directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/gh-auto-discover/`
//! - macOS: `~/Library/Application Support/gh-auto-discover/`
//! - Windows: `%APPDATA%\gh-auto-discover\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gh-auto-discover";

/// Get the application config directory
///
/// The directory is not created; callers only read from it.
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get path to the user-level config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}
