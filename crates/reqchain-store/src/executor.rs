//! The abstract command executor consumed by the synchronizer.

use async_trait::async_trait;

use crate::command::{StoreCommand, StoreQuery};
use crate::error::StoreError;
use crate::record::StoreRecord;

/// Narrow interface to the graph store.
///
/// Implementations must be safe for concurrent use; the synchronizer holds
/// one executor for the lifetime of the process and issues every store
/// operation through it.
#[async_trait]
pub trait StoreExecutor: Send + Sync {
    /// Issue a mutating command. Success carries no payload; failure is
    /// always explicit, never swallowed.
    async fn execute(&self, command: StoreCommand) -> Result<(), StoreError>;

    /// Issue a read-only query, returning zero or more matching records.
    async fn select(&self, query: StoreQuery) -> Result<Vec<StoreRecord>, StoreError>;
}
