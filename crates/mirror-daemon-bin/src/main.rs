//! Feed mirror daemon - keeps a local SQLite mirror of the upstream feed
//! eventually consistent, including deletions the API never announces.

mod app;
mod feed_adapter;

use std::path::PathBuf;

use clap::Parser;
use mirror_config_and_utils::{init_logging, Config};

/// Feed mirror daemon command-line interface.
#[derive(Parser)]
#[command(name = "feed-mirror-daemon")]
#[command(about = "Mirrors the upstream feed and its tags into a local SQLite database")]
#[command(version)]
struct Cli {
    /// Path of the SQLite mirror database
    #[arg(long)]
    database: Option<PathBuf>,

    /// Base URL of the upstream feed API
    #[arg(long)]
    api_base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Mirror the entire history (slowly), then exit
    #[arg(long)]
    all: bool,

    /// Item id to start at when doing the complete import
    #[arg(long)]
    start_at: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Defaults, then environment, then flags.
    let mut config = Config::new();
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if let Some(url) = cli.api_base_url {
        config.api_base_url = url;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logging(&config.log_level);

    if cli.all {
        app::run_backfill(config, cli.start_at).await
    } else {
        app::run_daemon(config).await
    }
}
