//! Version-chaining synchronizer core.
//!
//! Incoming requirement records are reconciled against a graph store
//! without ever overwriting data in place: when a record changes, a new
//! version vertex is created, linked to its predecessor with an
//! `updated_from` edge, the predecessor's relationship edges are copied
//! onto the new version, and the predecessor is retired. All store access
//! goes through the abstract [`StoreExecutor`](reqchain_store::StoreExecutor);
//! feed access, scheduling and transport live in sibling crates.

pub mod chain;
pub mod detect;
pub mod error;
pub mod migrate;
pub mod normalize;
pub mod record;
pub mod sync;

pub use chain::{RecordOutcome, VersionChainManager};
pub use detect::{assess, has_changed, ChangeAssessment};
pub use error::SyncError;
pub use migrate::{migrate_edges, MigrationReport};
pub use normalize::normalize_title;
pub use record::{IncomingRecord, REQUIREMENT_TYPE, STATUS_END_OF_LIFE, UPDATED_FROM_EDGE};
pub use sync::{CycleStats, Synchronizer};
