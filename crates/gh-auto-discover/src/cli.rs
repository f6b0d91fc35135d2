use anyhow::{Context, Result};
use clap::Parser;
use gh_discover::{DiscoveryError, RepositoryId};
use gh_discover_config::AppConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gh-auto-discover")]
#[command(version)]
#[command(about = "Discover repositories with an Enhansome configuration and open review issues")]
pub struct Cli {
    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository receiving the tracking issues (owner/name)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: Option<String>,

    /// Allowlist file
    #[arg(long)]
    pub allowlist: Option<PathBuf>,

    /// Denylist file (may be absent)
    #[arg(long)]
    pub denylist: Option<PathBuf>,

    /// Log the issues that would be created without creating them
    #[arg(long)]
    pub dry_run: bool,

    /// Number of concurrent workers (zero or negative uses the default)
    #[arg(long, allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Config file (defaults to .gh-discover.toml, then the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Layer command line overrides on top of the loaded config
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.allowlist {
            config.allowlist_path = path.clone();
        }
        if let Some(path) = &self.denylist {
            config.denylist_path = path.clone();
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
    }

    /// The repository receiving tracking issues
    pub fn tracker(&self) -> Result<RepositoryId> {
        let repo = self
            .repo
            .as_deref()
            .map(str::trim)
            .filter(|repo| !repo.is_empty())
            .context("Repository is required (set GITHUB_REPOSITORY or use --repo)")?;
        Ok(RepositoryId::parse(repo).map_err(DiscoveryError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["gh-auto-discover"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "--token",
            "abc",
            "--repo",
            "org/registry",
            "--allowlist",
            "lists/allow.txt",
            "--dry-run",
            "--workers",
            "8",
        ]);

        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(cli.dry_run);
        assert_eq!(cli.workers, Some(8));
        assert_eq!(cli.tracker().unwrap().as_str(), "org/registry");
    }

    #[test]
    fn test_negative_workers_accepted() {
        let cli = parse(&["--workers", "-1"]);
        assert_eq!(cli.workers, Some(-1));
    }

    #[test]
    fn test_apply_overrides_config() {
        let cli = parse(&["--denylist", "deny.txt", "--workers", "0"]);
        let mut config = AppConfig::default();

        cli.apply(&mut config);

        assert_eq!(config.denylist_path, PathBuf::from("deny.txt"));
        assert_eq!(config.allowlist_path, PathBuf::from("allowlist.txt"));
        assert_eq!(config.workers, 0);
    }

    #[test]
    fn test_invalid_tracker_is_error() {
        let cli = parse(&["--repo", "not-a-repo"]);
        let err = cli.tracker().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiscoveryError>(),
            Some(DiscoveryError::InvalidTracker(_))
        ));
        assert!(err.to_string().contains("invalid tracking repository"));
    }

    #[test]
    fn test_blank_tracker_is_error() {
        let cli = parse(&["--repo", "  "]);
        let err = cli.tracker().unwrap_err();
        assert!(err.to_string().contains("Repository is required"));
    }
}
