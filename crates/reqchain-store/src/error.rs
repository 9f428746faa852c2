//! Error taxonomy for store operations.

use thiserror::Error;

/// Failure outcome of a store operation.
///
/// The distinction that matters to callers is retryability: transport
/// failures are worth retrying at the next cycle, while a rejected command
/// will be rejected again no matter how often it is replayed.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a store-level answer (connect, timeout,
    /// protocol error). Retryable at the next scheduled cycle.
    #[error("store transport failure: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The store answered with a non-success status. Not retryable for the
    /// same command.
    #[error("store rejected command (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The store answered 200 but the payload did not have the expected
    /// shape.
    #[error("malformed store response: {reason}")]
    MalformedResponse { reason: String },

    /// A command could not be rendered because an identifier (type name,
    /// field name) failed validation. This is a caller bug, never sent to
    /// the store.
    #[error("invalid store command: {reason}")]
    InvalidCommand { reason: String },

    /// A value did not parse as a store record id.
    #[error("invalid record id `{value}`")]
    InvalidRid { value: String },
}

impl StoreError {
    /// Whether the operation is worth replaying on a later cycle.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Transport { .. })
    }
}
