//! Periodic cycle trigger with graceful shutdown.
//!
//! The core exposes a single idempotent run-once operation; this module is
//! the explicit trigger that calls it. Cycles never overlap: the loop
//! awaits each cycle before taking the next tick, which is the
//! mutual-exclusion precondition the synchronizer requires.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use reqchain_feed::RecordFeed;
use reqchain_sync::{CycleStats, Synchronizer};
use tokio::signal;
use tokio::time;
use tracing::{error, info, warn};

use crate::config::SchedulerConfig;

/// Fetch-then-reconcile, bundled so the loop and `--once` share one path.
pub struct CycleRunner {
    feed: Box<dyn RecordFeed>,
    synchronizer: Synchronizer,
}

impl CycleRunner {
    pub fn new(feed: impl RecordFeed + 'static, synchronizer: Synchronizer) -> Self {
        CycleRunner {
            feed: Box::new(feed),
            synchronizer,
        }
    }

    /// One full cycle. If the feed is unavailable or malformed the cycle
    /// fails before any store operation is issued.
    pub async fn run_once(&self) -> anyhow::Result<CycleStats> {
        let records = self
            .feed
            .fetch()
            .await
            .context("feed fetch failed; no store mutations this cycle")?;
        Ok(self.synchronizer.run_cycle(&records).await)
    }
}

/// Run cycles at a fixed interval until a shutdown signal arrives. An
/// in-flight cycle is given `shutdown_grace_secs` to finish; after that it
/// is abandoned, which the next run's idempotent logic tolerates.
pub async fn run(runner: CycleRunner, config: &SchedulerConfig) -> anyhow::Result<()> {
    let runner = Arc::new(runner);
    let mut interval = time::interval(Duration::from_secs(config.interval_secs));
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);
    info!(interval_secs = config.interval_secs, "scheduler started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let runner = runner.clone();
                let mut cycle = tokio::spawn(async move {
                    if let Err(e) = runner.run_once().await {
                        error!(error = %e, "cycle failed");
                    }
                });

                tokio::select! {
                    result = &mut cycle => {
                        if let Err(e) = result {
                            error!(error = %e, "cycle task aborted unexpectedly");
                        }
                    }
                    _ = signal::ctrl_c() => {
                        info!("shutdown requested; waiting for the in-flight cycle");
                        let grace = Duration::from_secs(config.shutdown_grace_secs);
                        match time::timeout(grace, cycle).await {
                            Ok(_) => info!("in-flight cycle finished; stopping"),
                            Err(_) => warn!(
                                grace_secs = config.shutdown_grace_secs,
                                "grace period elapsed; abandoning in-flight cycle"
                            ),
                        }
                        return Ok(());
                    }
                }
            }
            _ = signal::ctrl_c() => {
                info!("shutdown requested; stopping scheduler");
                return Ok(());
            }
        }
    }
}
