//! The logical operations the synchronizer issues against the store.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::StoreError;
use crate::record::StoreRecord;

/// Opaque store-assigned record id (ArcadeDB RID, `#<bucket>:<position>`).
///
/// The store owns these; we only ever read them back and hand them to edge
/// operations. Construction goes through [`Rid::parse`], which is what lets
/// the SQL renderer embed a RID in command text without an injection risk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rid(String);

impl Rid {
    /// Parse a RID of the shape `#<digits>:<digits>`.
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        let invalid = || StoreError::InvalidRid {
            value: value.to_string(),
        };

        let rest = value.strip_prefix('#').ok_or_else(invalid)?;
        let (bucket, position) = rest.split_once(':').ok_or_else(invalid)?;
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(bucket) || !all_digits(position) {
            return Err(invalid());
        }
        Ok(Rid(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Rid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One clause of an equality-only filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Eq { field: String, value: String },
    Ne { field: String, value: String },
}

impl Clause {
    pub fn field(&self) -> &str {
        match self {
            Clause::Eq { field, .. } | Clause::Ne { field, .. } => field,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Clause::Eq { value, .. } | Clause::Ne { value, .. } => value,
        }
    }
}

/// Conjunction of equality/inequality clauses over record fields.
///
/// `@rid` is accepted as a field name and compares against the record id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn ne(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Ne {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate the filter against an already-fetched record. Used by
    /// in-memory executors; the ArcadeDB executor pushes the filter into
    /// the query instead.
    pub fn matches(&self, record: &StoreRecord) -> bool {
        self.clauses.iter().all(|clause| {
            let actual = if clause.field() == "@rid" {
                record.rid().map(Rid::as_str)
            } else {
                record.field_str(clause.field())
            };
            match clause {
                Clause::Eq { value, .. } => actual == Some(value.as_str()),
                Clause::Ne { value, .. } => actual != Some(value.as_str()),
            }
        })
    }
}

/// Which incident edges of a vertex to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDirection {
    Outgoing,
    Incoming,
}

/// A mutating store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// `CREATE VERTEX <type> SET <fields>`
    CreateVertex {
        vertex_type: String,
        fields: BTreeMap<String, String>,
    },
    /// `CREATE EDGE <type> FROM <from> TO <to> [IF NOT EXISTS]`
    ///
    /// Edges are immutable once created; `if_not_exists` makes replays of
    /// the same creation a no-op instead of a duplicate.
    CreateEdge {
        edge_type: String,
        from: Rid,
        to: Rid,
        if_not_exists: bool,
    },
    /// `UPDATE <type> SET <fields> WHERE <filter>`
    Update {
        vertex_type: String,
        filter: Filter,
        fields: BTreeMap<String, String>,
    },
}

impl StoreCommand {
    /// Short operation tag for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreCommand::CreateVertex { .. } => "CREATE_VERTEX",
            StoreCommand::CreateEdge { .. } => "CREATE_EDGE",
            StoreCommand::Update { .. } => "UPDATE",
        }
    }
}

/// A read-only store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreQuery {
    /// `SELECT FROM <type> WHERE <filter>`
    Select { vertex_type: String, filter: Filter },
    /// Enumerate the edges incident to one vertex, in one direction.
    Edges { vertex: Rid, direction: EdgeDirection },
}
