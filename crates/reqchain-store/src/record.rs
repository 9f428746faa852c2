//! Structured views over store result rows.
//!
//! Result payloads are parsed into typed records instead of being scanned
//! as text, so nothing here depends on the formatting or key order of the
//! store's JSON.

use std::collections::BTreeMap;

use crate::command::Rid;

/// One record returned by a `SELECT`, with its store metadata split out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreRecord {
    rid: Option<Rid>,
    type_name: Option<String>,
    fields: BTreeMap<String, serde_json::Value>,
}

impl StoreRecord {
    /// Build a record from one element of the store's `result` array.
    /// Returns `None` for non-object elements.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut record = StoreRecord::default();
        for (key, value) in object {
            match key.as_str() {
                "@rid" => {
                    record.rid = value.as_str().and_then(|s| Rid::parse(s).ok());
                }
                "@type" => {
                    record.type_name = value.as_str().map(str::to_string);
                }
                _ => {
                    record.fields.insert(key.clone(), value.clone());
                }
            }
        }
        Some(record)
    }

    pub fn rid(&self) -> Option<&Rid> {
        self.rid.as_ref()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// String value of a field, if present and textual.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    /// Test helper: a record with the given rid and no fields.
    pub fn for_tests(rid: &str) -> Self {
        StoreRecord {
            rid: Rid::parse(rid).ok(),
            ..StoreRecord::default()
        }
    }

    /// Test helper: add a string field.
    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.fields
            .insert(name.to_string(), serde_json::Value::from(value));
        self
    }
}

/// A typed, directed edge as returned by an edge enumeration query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub edge_type: String,
    pub from: Rid,
    pub to: Rid,
}

impl EdgeRecord {
    /// Interpret a record from `SELECT @rid, @type, @out, @in FROM (...)`
    /// as an edge. Records missing any of type/out/in are not edges.
    pub fn from_record(record: &StoreRecord) -> Option<Self> {
        let edge_type = record.type_name()?.to_string();
        let from = Rid::parse(record.field_str("@out")?).ok()?;
        let to = Rid::parse(record.field_str("@in")?).ok()?;
        Some(EdgeRecord {
            edge_type,
            from,
            to,
        })
    }
}
