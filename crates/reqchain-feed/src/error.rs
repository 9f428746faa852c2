//! Feed-level failures. All of them are cycle-level: no records, no store
//! mutations for that run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed endpoint never answered (connect, timeout, protocol).
    #[error("feed transport failure: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// The feed answered with a non-success status.
    #[error("feed returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The feed answered but the document is not a requirement feed.
    #[error("malformed feed document: {reason}")]
    Malformed { reason: String },
}
