//! reqchain: keeps a graph store's requirement version chains in step with
//! an external feed.

mod config;
mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use reqchain_feed::OslcHttpFeed;
use reqchain_store::{ArcadeDbExecutor, StoreExecutor};
use reqchain_sync::Synchronizer;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "reqchain", version, about = "Version-chaining requirement synchronizer")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "reqchain.toml")]
    config: PathBuf,

    /// Run a single synchronization cycle and exit.
    #[arg(long)]
    once: bool,

    /// Override the configured cycle interval, in seconds.
    #[arg(long)]
    interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = config::load(&cli.config)?;
    if let Some(secs) = cli.interval_secs {
        config.scheduler.interval_secs = secs;
    }

    let executor: Arc<dyn StoreExecutor> = Arc::new(
        ArcadeDbExecutor::new(config.store.url.clone(), config.store.database.clone())
            .with_credentials(config.store.username.clone(), config.store.password.clone()),
    );
    let feed = OslcHttpFeed::new(config.feed.url.clone());
    let runner = scheduler::CycleRunner::new(feed, Synchronizer::new(executor));

    if cli.once {
        runner.run_once().await?;
        return Ok(());
    }

    scheduler::run(runner, &config.scheduler).await
}
