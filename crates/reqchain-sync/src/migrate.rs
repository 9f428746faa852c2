//! Carrying a superseded version's edges over to its replacement.

use reqchain_store::{
    EdgeDirection, EdgeRecord, Rid, StoreCommand, StoreError, StoreExecutor, StoreQuery,
};
use tracing::{debug, error};

use crate::record::UPDATED_FROM_EDGE;

/// Outcome of one migration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Edge creations issued successfully (including ones the store
    /// collapsed as already present).
    pub migrated: usize,
    /// Edge creations the store failed; logged individually.
    pub failed: usize,
}

/// Re-create every edge incident to `old` on `new`, preserving type and
/// direction. `updated_from` edges are chain-internal and skipped. The
/// originals on `old` stay untouched; they are the historical record.
///
/// Creation uses if-not-exists semantics, so replaying a partially applied
/// migration is a no-op for the edges that already made it. One edge
/// failing is reported and counted but never aborts the remaining edges.
pub async fn migrate_edges(
    executor: &dyn StoreExecutor,
    old: &Rid,
    new: &Rid,
) -> Result<MigrationReport, StoreError> {
    let mut report = MigrationReport::default();

    for direction in [EdgeDirection::Outgoing, EdgeDirection::Incoming] {
        let rows = executor
            .select(StoreQuery::Edges {
                vertex: old.clone(),
                direction,
            })
            .await?;

        for edge in rows.iter().filter_map(EdgeRecord::from_record) {
            if edge.edge_type == UPDATED_FROM_EDGE {
                continue;
            }
            let (from, to) = match direction {
                EdgeDirection::Outgoing => (new.clone(), edge.to.clone()),
                EdgeDirection::Incoming => (edge.from.clone(), new.clone()),
            };
            debug!(edge_type = %edge.edge_type, %from, %to, "migrating edge");
            let command = StoreCommand::CreateEdge {
                edge_type: edge.edge_type.clone(),
                from,
                to,
                if_not_exists: true,
            };
            match executor.execute(command).await {
                Ok(()) => report.migrated += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(
                        edge_type = %edge.edge_type,
                        old = %old,
                        new = %new,
                        error = %e,
                        "failed to migrate edge"
                    );
                }
            }
        }
    }

    Ok(report)
}
