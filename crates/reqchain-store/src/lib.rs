//! Logical command layer for the graph store.
//!
//! The synchronizer never builds query text itself. It describes the four
//! operations it needs — create vertex, create edge, update, select — as
//! data ([`StoreCommand`] / [`StoreQuery`]) and hands them to a
//! [`StoreExecutor`]. The ArcadeDB implementation renders them to SQL with
//! bound parameters, so field values never end up concatenated into
//! executable command text.

pub mod arcade;
pub mod command;
pub mod error;
pub mod executor;
pub mod record;

pub use arcade::ArcadeDbExecutor;
pub use command::{Clause, EdgeDirection, Filter, Rid, StoreCommand, StoreQuery};
pub use error::StoreError;
pub use executor::StoreExecutor;
pub use record::{EdgeRecord, StoreRecord};
