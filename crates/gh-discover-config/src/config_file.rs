use std::path::PathBuf;

const CONFIG_FILE: &str = ".gh-discover.toml";

/// Load config file content from CWD first, then the user config directory
///
/// Searches for:
/// 1. `.gh-discover.toml` in the current working directory
/// 2. `config.toml` in the user config directory (see [`crate::paths`])
///
/// Returns the path and file content if found, None otherwise.
pub fn load_config_file() -> Option<(PathBuf, String)> {
    candidate_paths().into_iter().find_map(|path| {
        let content = std::fs::read_to_string(&path).ok()?;
        log::debug!("Loaded config from {}", path.display());
        Some((path, content))
    })
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Ok(user_config) = crate::paths::app_config_path() {
        paths.push(user_config);
    }
    paths
}
