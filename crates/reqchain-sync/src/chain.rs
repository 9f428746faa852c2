//! Per-record orchestration of the version chain.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqchain_store::{Filter, Rid, StoreCommand, StoreExecutor, StoreQuery, StoreRecord};
use tracing::{debug, info, warn};

use crate::detect::{self, ChangeAssessment};
use crate::error::SyncError;
use crate::migrate::migrate_edges;
use crate::record::{IncomingRecord, REQUIREMENT_TYPE, STATUS_END_OF_LIFE, UPDATED_FROM_EDGE};

/// How one incoming record was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// First sight of the identifier; a first version was created.
    Created,
    /// A new version was created and its predecessor retired.
    Superseded,
    /// Nothing differed (or an anomaly was logged and skipped); no store
    /// mutation was issued.
    Unchanged,
}

/// Drives the create / link / migrate / retire sequence for one identifier
/// at a time.
///
/// No cross-operation transaction exists; the sequence is ordered so that
/// a crash between steps leaves the new version under-linked but never the
/// old version retired without a successor, and every step is idempotent
/// enough for the next cycle to resume.
pub struct VersionChainManager {
    executor: Arc<dyn StoreExecutor>,
}

impl VersionChainManager {
    pub fn new(executor: Arc<dyn StoreExecutor>) -> Self {
        Self { executor }
    }

    /// Reconcile one incoming record against the store.
    pub async fn apply(&self, incoming: &IncomingRecord) -> Result<RecordOutcome, SyncError> {
        let current = self.current_version(&incoming.identifier).await?;
        match detect::assess(incoming, current.as_ref()) {
            ChangeAssessment::Absent => self.create_first_version(incoming).await,
            ChangeAssessment::Unchanged => {
                debug!(identifier = %incoming.identifier, "no material change");
                Ok(RecordOutcome::Unchanged)
            }
            ChangeAssessment::Changed => {
                // assess only reports a change against a stored version.
                let Some(current) = current else {
                    return Ok(RecordOutcome::Unchanged);
                };
                self.supersede(incoming, &current).await
            }
        }
    }

    /// No non-retired version exists for the identifier. The same version
    /// may still be stored in retired form: a record that arrives already
    /// carrying the terminal status tag is created once and is invisible
    /// to the current-version query from then on, so the ref re-query is
    /// what keeps every later cycle from re-creating it.
    async fn create_first_version(
        &self,
        incoming: &IncomingRecord,
    ) -> Result<RecordOutcome, SyncError> {
        if let Some(rid) = self
            .resolve_version_ref(&incoming.identifier, &incoming.modified)
            .await?
        {
            debug!(
                identifier = %incoming.identifier,
                rid = %rid,
                "version already stored; nothing to create"
            );
            return Ok(RecordOutcome::Unchanged);
        }

        self.create_version(incoming).await?;
        info!(identifier = %incoming.identifier, "created first version");
        Ok(RecordOutcome::Created)
    }

    /// The store's current non-retired version of an identifier.
    ///
    /// More than one live version means a previous supersession was cut
    /// short before retirement. Returning the oldest lets the resumed
    /// supersession retire it against the already-created successor.
    async fn current_version(&self, identifier: &str) -> Result<Option<StoreRecord>, SyncError> {
        let mut matches = self
            .executor
            .select(StoreQuery::Select {
                vertex_type: REQUIREMENT_TYPE.to_string(),
                filter: Filter::new()
                    .eq("identifier", identifier)
                    .ne("status", STATUS_END_OF_LIFE),
            })
            .await?;

        if matches.len() > 1 {
            warn!(
                identifier,
                live = matches.len(),
                "multiple non-retired versions found; resuming from the oldest"
            );
            matches.sort_by(|a, b| {
                a.field_str("modified")
                    .unwrap_or_default()
                    .cmp(b.field_str("modified").unwrap_or_default())
            });
        }
        Ok(matches.into_iter().next())
    }

    /// Create a version vertex carrying the incoming fields verbatim.
    async fn create_version(&self, incoming: &IncomingRecord) -> Result<(), SyncError> {
        self.executor
            .execute(StoreCommand::CreateVertex {
                vertex_type: REQUIREMENT_TYPE.to_string(),
                fields: incoming.vertex_fields(),
            })
            .await?;
        Ok(())
    }

    /// Look up the ref of the version identified by `(identifier, modified)`.
    /// Relies on the store's read-after-write consistency for the query
    /// immediately following a create.
    async fn resolve_version_ref(
        &self,
        identifier: &str,
        modified: &str,
    ) -> Result<Option<Rid>, SyncError> {
        let matches = self
            .executor
            .select(StoreQuery::Select {
                vertex_type: REQUIREMENT_TYPE.to_string(),
                filter: Filter::new()
                    .eq("identifier", identifier)
                    .eq("modified", modified),
            })
            .await?;

        if matches.len() > 1 {
            warn!(
                identifier,
                modified,
                matches = matches.len(),
                "version ref query is ambiguous; using the first match"
            );
        }
        Ok(matches.into_iter().find_map(|r| r.rid().cloned()))
    }

    /// Create the successor, link it, carry the edges over, retire the
    /// predecessor. Ordering is significant; see the type-level docs.
    async fn supersede(
        &self,
        incoming: &IncomingRecord,
        current: &StoreRecord,
    ) -> Result<RecordOutcome, SyncError> {
        let identifier = incoming.identifier.as_str();
        let old_rid = current
            .rid()
            .cloned()
            .ok_or_else(|| SyncError::MissingRef {
                identifier: identifier.to_string(),
            })?;

        // A vertex with the incoming (identifier, modified) may already
        // exist if an earlier cycle was cut short after the create; reuse
        // it instead of producing a sibling.
        let existing = self
            .resolve_version_ref(identifier, &incoming.modified)
            .await?;
        let new_rid = match existing {
            Some(rid) => {
                debug!(identifier, rid = %rid, "new version already present; resuming supersession");
                rid
            }
            None => {
                self.create_version(incoming).await?;
                self.resolve_version_ref(identifier, &incoming.modified)
                    .await?
                    .ok_or_else(|| SyncError::RefResolution {
                        identifier: identifier.to_string(),
                    })?
            }
        };

        if new_rid == old_rid {
            // The re-query handed back the record we are trying to
            // supersede. Retiring or linking here would corrupt the chain,
            // so the record is skipped and the condition surfaced.
            warn!(
                identifier,
                rid = %new_rid,
                "new version resolved to the record it should supersede; \
                 skipping link, migration and retirement"
            );
            return Ok(RecordOutcome::Unchanged);
        }

        self.executor
            .execute(StoreCommand::CreateEdge {
                edge_type: UPDATED_FROM_EDGE.to_string(),
                from: new_rid.clone(),
                to: old_rid.clone(),
                if_not_exists: true,
            })
            .await?;

        let report = migrate_edges(self.executor.as_ref(), &old_rid, &new_rid).await?;
        if report.failed > 0 {
            warn!(
                identifier,
                failed = report.failed,
                migrated = report.migrated,
                "edge migration completed with failures"
            );
        }

        let fields = BTreeMap::from([
            ("status".to_string(), STATUS_END_OF_LIFE.to_string()),
            ("endOfLife".to_string(), incoming.modified.clone()),
        ]);
        self.executor
            .execute(StoreCommand::Update {
                vertex_type: REQUIREMENT_TYPE.to_string(),
                filter: Filter::new().eq("@rid", old_rid.as_str()),
                fields,
            })
            .await?;

        info!(
            identifier,
            old = %old_rid,
            new = %new_rid,
            migrated = report.migrated,
            "superseded version"
        );
        Ok(RecordOutcome::Superseded)
    }
}
