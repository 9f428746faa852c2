//! Feed collaborators: where incoming records come from.
//!
//! The synchronizer core only consumes an ordered sequence of
//! [`IncomingRecord`](reqchain_sync::IncomingRecord)s; this crate supplies
//! them. The concrete implementation fetches an OSLC requirement document
//! (RDF/XML) over HTTP and extracts the five record fields.

pub mod error;
pub mod http;
pub mod rdf;

use async_trait::async_trait;
use reqchain_sync::IncomingRecord;

pub use error::FeedError;
pub use http::OslcHttpFeed;
pub use rdf::RdfRequirementParser;

/// A source of incoming requirement records.
///
/// A failed fetch fails the whole cycle; the synchronizer performs no
/// store mutation for that run.
#[async_trait]
pub trait RecordFeed: Send + Sync {
    async fn fetch(&self) -> Result<Vec<IncomingRecord>, FeedError>;
}
