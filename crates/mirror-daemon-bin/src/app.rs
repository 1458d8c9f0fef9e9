//! Daemon startup and wiring.

use crate::feed_adapter::FeedClientSource;
use anyhow::Context;
use feed_api_client::FeedClient;
use feed_reconcile_worker::{spawn_all_tiers, BackfillPacing};
use mirror_config_and_utils::Config;
use mirror_database::{DatabasePool, PoolConfig};
use std::sync::Arc;
use tracing::{info, warn};

/// Open the store and build the feed source.
///
/// Failing to reach the store here is fatal; everything after startup is
/// recoverable.
fn bootstrap(config: &Config) -> anyhow::Result<(Arc<FeedClientSource>, Arc<DatabasePool>)> {
    let pool = DatabasePool::open(&config.database_path, PoolConfig::default())
        .context("could not open mirror database")?;
    pool.health_check()
        .context("could not reach mirror database")?;

    let client =
        FeedClient::new(&config.api_base_url).context("invalid feed API base url")?;

    Ok((Arc::new(FeedClientSource::new(client)), Arc::new(pool)))
}

/// Run the scheduled tiers forever.
pub async fn run_daemon(config: Config) -> anyhow::Result<()> {
    let (source, pool) = bootstrap(&config)?;
    info!(database = pool.path(), api = %config.api_base_url, "Feed mirror daemon starting");

    // Catch up on the recent past once before the tiers take over.
    match feed_reconcile_worker::run_window_sync(
        source.as_ref(),
        pool.as_ref(),
        chrono::Duration::hours(48),
    )
    .await
    {
        Ok(report) => info!(
            upserted = report.items.effective(),
            deleted = report.deleted,
            "Initial catch-up sync finished"
        ),
        Err(e) => warn!(error = %e, "Initial catch-up sync failed, tiers will recover"),
    }

    let handles = spawn_all_tiers(source, pool);
    info!(tiers = handles.len(), "Tier scheduler started");

    // Park forever; the tier tasks run until the process is killed.
    std::future::pending::<()>().await;
    Ok(())
}

/// Mirror the entire history once, then exit.
pub async fn run_backfill(config: Config, start_at: Option<u64>) -> anyhow::Result<()> {
    let (source, pool) = bootstrap(&config)?;
    info!(database = pool.path(), ?start_at, "Starting full backfill");

    let report = feed_reconcile_worker::run_backfill(
        source.as_ref(),
        pool.as_ref(),
        start_at,
        &BackfillPacing::default(),
    )
    .await?;

    info!(
        attempts = report.attempts,
        pages = report.pages,
        items = report.items,
        deleted = report.deleted,
        "Backfill complete"
    );
    Ok(())
}
