//! Per-page lookup tables for linked resources

use super::coerce_id;
use crate::error::{Error, Result};
use crate::extract::extract;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Path of the linked departments inside a users page
pub const LINKED_DEPARTMENTS: &str = "linked.departments";

/// Path of the linked locations inside a users page
pub const LINKED_LOCATIONS: &str = "linked.locations";

/// Mapping from a linked resource id (as string) to its name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: HashMap<String, String>,
}

impl LookupTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from the array at `path` in a response body
    ///
    /// A page that carries no such array yields an empty table. Entries
    /// without an id or without a string name are skipped.
    pub fn from_response(body: &Value, path: &str) -> Result<Self> {
        let rows = match extract(body, Some(path)) {
            Ok(rows) => rows,
            Err(Error::RecordExtraction { .. }) => {
                debug!(path, "No linked resources on this page");
                return Ok(Self::new());
            }
            Err(e) => return Err(e),
        };

        Ok(rows.iter().collect())
    }

    /// Insert a single entry
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.entries.insert(id.into(), name.into());
    }

    /// Look up the name for an id; numbers and strings are both accepted
    pub fn resolve(&self, id: &Value) -> Option<&str> {
        let key = coerce_id(id)?;
        self.entries.get(&key).map(String::as_str)
    }

    /// Look up the name for a string id
    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<&'a Value> for LookupTable {
    fn from_iter<I: IntoIterator<Item = &'a Value>>(iter: I) -> Self {
        let mut table = Self::new();
        for row in iter {
            let id = row.get("id").and_then(coerce_id);
            let name = row.get("name").and_then(Value::as_str);
            if let (Some(id), Some(name)) = (id, name) {
                table.insert(id, name);
            }
        }
        table
    }
}

/// Department and location tables for one users page
#[derive(Debug, Clone, Default)]
pub struct UserLookups {
    pub departments: LookupTable,
    pub locations: LookupTable,
}

impl UserLookups {
    /// Build both tables from the same response body
    pub fn from_response(body: &Value) -> Result<Self> {
        Ok(Self {
            departments: LookupTable::from_response(body, LINKED_DEPARTMENTS)?,
            locations: LookupTable::from_response(body, LINKED_LOCATIONS)?,
        })
    }
}
