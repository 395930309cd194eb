//! Extraction result types

use serde_json::Value;

/// What a key path resolved to
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    /// The path pointed at one object (singleton resource)
    Single(Value),
    /// The path pointed at an array; elements in original order
    Many(Vec<Value>),
}

impl Extracted {
    /// Number of rows
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Many(rows) => rows.len(),
        }
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the rows
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        match self {
            Self::Single(row) => std::slice::from_ref(row).iter(),
            Self::Many(rows) => rows.iter(),
        }
    }

    /// Consume into a list of rows
    pub fn into_rows(self) -> Vec<Value> {
        match self {
            Self::Single(row) => vec![row],
            Self::Many(rows) => rows,
        }
    }
}

impl IntoIterator for Extracted {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_rows().into_iter()
    }
}
