use anyhow::Context;
use clap::Parser;
use contracts::domain::a001_supplier_feed::FeedRecord;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u502_sync_marketplace_stocks::{SyncMarketplaceStocks, SyncResult};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use stock_sync::shared::config::{load_config, TargetConfig};
use stock_sync::shared::error::SyncError;
use stock_sync::shared::marketplaces::{build_client, http_client};
use stock_sync::system;
use stock_sync::usecases::u501_load_supplier_feed::load_feed;
use stock_sync::usecases::u502_sync_marketplace_stocks::executor::SyncSettings;
use stock_sync::usecases::u502_sync_marketplace_stocks::SyncExecutor;

#[derive(Parser, Debug)]
#[command(
    name = "stock-sync",
    version,
    about = "Sync supplier stock and prices to Ozon and Yandex Market"
)]
struct Cli {
    /// Path to config.toml (default: next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use a local feed file (.zip or export) instead of downloading
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Sync only the named targets (repeatable)
    #[arg(long = "target")]
    targets: Vec<String>,

    /// Reconcile and report without sending updates
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    system::tracing::initialize()?;

    let config = load_config(cli.config.as_deref(), &cli.targets)?;
    let targets: Vec<&TargetConfig> = config.targets.iter().filter(|t| t.enabled).collect();
    if targets.is_empty() {
        tracing::warn!("No enabled targets, nothing to do");
        return Ok(ExitCode::SUCCESS);
    }

    let http = http_client().context("Failed to build HTTP client")?;
    let feed = load_feed(&http, &config.feed, cli.feed.as_deref()).await?;

    tracing::info!(
        "{}: {} targets{}",
        SyncMarketplaceStocks::full_name(),
        targets.len(),
        if cli.dry_run { " (dry run)" } else { "" }
    );

    let mut failed = 0usize;
    for target in targets {
        match sync_target(target, &feed, cli.dry_run).await {
            Ok(result) => log_result(&result),
            Err(e) => {
                failed += 1;
                tracing::error!(
                    "Target '{}' failed{}: {}",
                    target.name,
                    if e.is_transient() { " (transient, rerun may succeed)" } else { "" },
                    e
                );
            }
        }
    }

    if failed > 0 {
        tracing::error!("{} target(s) failed", failed);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

async fn sync_target(
    target: &TargetConfig,
    feed: &[FeedRecord],
    dry_run: bool,
) -> Result<SyncResult, SyncError> {
    let client = build_client(target)?;
    let mut settings = SyncSettings::from_target(target);
    settings.dry_run = dry_run;

    SyncExecutor::new(Arc::from(client), settings)
        .sync(feed)
        .await
}

fn log_result(result: &SyncResult) {
    tracing::info!(
        "Target '{}' ({}): {} listings, {} in stock, {} out of stock, {} prices; {} stock / {} price chunks sent",
        result.target,
        result.marketplace,
        result.listings,
        result.applied.len(),
        result.out_of_stock(),
        result.prices.len(),
        result.stock_chunks,
        result.price_chunks
    );
}
