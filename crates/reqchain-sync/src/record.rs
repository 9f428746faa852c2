//! The incoming record shape and the store vocabulary it maps onto.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Vertex type of a requirement version in the store.
pub const REQUIREMENT_TYPE: &str = "Requirement";

/// Chain-internal edge from a version to the one it supersedes. Never
/// migrated, never removed.
pub const UPDATED_FROM_EDGE: &str = "updated_from";

/// Terminal status of a superseded version.
pub const STATUS_END_OF_LIFE: &str = "End of life";

/// One record of the external feed, as handed to the synchronizer.
///
/// All five fields are opaque strings; the core never parses timestamps or
/// coerces types. `identifier` is the stable natural key shared by every
/// version of the same logical requirement; `modified` is the version
/// discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingRecord {
    pub identifier: String,
    pub title: String,
    pub created: String,
    pub modified: String,
    pub status: String,
}

impl IncomingRecord {
    /// The field map stored on a version vertex created from this record.
    pub fn vertex_fields(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("identifier".to_string(), self.identifier.clone()),
            ("title".to_string(), self.title.clone()),
            ("created".to_string(), self.created.clone()),
            ("modified".to_string(), self.modified.clone()),
            ("status".to_string(), self.status.clone()),
        ])
    }
}
