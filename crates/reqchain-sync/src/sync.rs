//! Cycle-level iteration over the incoming feed.

use std::sync::Arc;

use reqchain_store::StoreExecutor;
use tracing::{error, info};

use crate::chain::{RecordOutcome, VersionChainManager};
use crate::record::IncomingRecord;

/// Aggregate outcome of one synchronization cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub created: usize,
    pub superseded: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Identifiers of the records that failed, in feed order.
    pub failures: Vec<String>,
}

impl CycleStats {
    pub fn total(&self) -> usize {
        self.created + self.superseded + self.unchanged + self.failed
    }
}

/// Entry point of the core: runs one idempotent pass over the feed.
///
/// Callers must not run two cycles concurrently against the same store;
/// overlapping cycles can race the supersession sequence. Within a cycle,
/// records are processed in feed order, one at a time.
pub struct Synchronizer {
    chain: VersionChainManager,
}

impl Synchronizer {
    pub fn new(executor: Arc<dyn StoreExecutor>) -> Self {
        Self {
            chain: VersionChainManager::new(executor),
        }
    }

    /// Process every incoming record once. One record failing never aborts
    /// the rest; failures are logged with their identifier and counted.
    pub async fn run_cycle(&self, records: &[IncomingRecord]) -> CycleStats {
        let mut stats = CycleStats::default();

        for record in records {
            match self.chain.apply(record).await {
                Ok(RecordOutcome::Created) => stats.created += 1,
                Ok(RecordOutcome::Superseded) => stats.superseded += 1,
                Ok(RecordOutcome::Unchanged) => stats.unchanged += 1,
                Err(e) => {
                    stats.failed += 1;
                    stats.failures.push(record.identifier.clone());
                    error!(
                        identifier = %record.identifier,
                        error = %e,
                        retryable = e.is_retryable(),
                        "record synchronization failed"
                    );
                }
            }
        }

        info!(
            created = stats.created,
            superseded = stats.superseded,
            unchanged = stats.unchanged,
            failed = stats.failed,
            "synchronization cycle finished"
        );
        stats
    }
}
