//! Per-record synchronization failures.

use reqchain_store::StoreError;
use thiserror::Error;

/// Why one record could not be synchronized. Never aborts the cycle; the
/// synchronizer logs it and moves on to the next record.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A new version vertex was created but its ref could not be read back
    /// on the `(identifier, modified)` re-query. The supersession is
    /// aborted for this record; no retirement was written, so the next
    /// cycle re-evaluates and resumes.
    #[error("could not resolve the store ref of the new version of `{identifier}`")]
    RefResolution { identifier: String },

    /// The stored current version exposes no ref, so it cannot be linked
    /// or retired.
    #[error("current version of `{identifier}` has no store ref")]
    MissingRef { identifier: String },
}

impl SyncError {
    /// Retryable failures are worth another attempt on the next scheduled
    /// cycle; the rest will fail identically until something else changes.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Store(e) => e.is_retryable(),
            SyncError::RefResolution { .. } => true,
            SyncError::MissingRef { .. } => false,
        }
    }
}
