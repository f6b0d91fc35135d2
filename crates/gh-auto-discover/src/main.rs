use anyhow::{Context, Result};
use clap::Parser;
use gh_client::{ClientManager, RateLimiter, TokenResolver};
use gh_discover::{Discoverer, DiscoveryOptions, ListFilter};
use gh_discover_config::AppConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

mod cli;
mod logger;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so clap sees GITHUB_TOKEN from it
    let dotenv = if std::env::var("GITHUB_TOKEN").is_err() {
        dotenvy::dotenv().ok()
    } else {
        None
    };

    logger::init();
    if let Some(path) = dotenv {
        log::debug!("Loaded .env file from: {:?}", path);
    }

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let tracker = cli.tracker()?;
    let filter = ListFilter::load(&config.allowlist_path, &config.denylist_path)?;

    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
        config.rate_limit_interval_ms.max(1),
    )));
    let manager = ClientManager::new(
        TokenResolver::new().with_explicit_token(cli.token.clone()),
        Arc::clone(&limiter),
    )
    .with_api_base_url(config.api_base_url.clone())
    .with_raw_host(config.raw_host.clone());
    let client = manager
        .create_client()
        .await
        .context("Failed to create GitHub client")?;

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let mut options = DiscoveryOptions::from_config(&config, tracker);
    options.dry_run = cli.dry_run;
    if options.dry_run {
        log::info!("Running in dry-run mode, no issues will be created");
    }

    let discoverer = Discoverer::new(Arc::new(client), limiter, filter, options)
        .with_cancellation(cancel);
    discoverer.run().await?;

    Ok(())
}

fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, finishing in-flight work");
            cancel.cancel();
        }
    });
}
