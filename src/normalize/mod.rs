//! Record normalization module
//!
//! Turns extracted rows into flat output records. Users get their linked
//! department and location resolved to names; other streams pass through.

mod lookup;
mod users;

pub use lookup::{LookupTable, UserLookups, LINKED_DEPARTMENTS, LINKED_LOCATIONS};
pub use users::{normalize_user, USER_FIELDS};

use crate::error::{Error, Result};
use crate::extract::Extracted;
use crate::types::JsonObject;
use serde_json::Value;

/// Coerce an id-like value to its string form
///
/// Strings are kept as they are and numbers become their decimal text.
/// `null` and every other type have no id, giving `None`; a missing
/// `reports_to_id` is therefore emitted as JSON `null`, not the text `"None"`.
pub fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// How a stream turns a page of rows into output records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordTransform {
    /// Rows are emitted as they come
    #[default]
    Passthrough,
    /// Rows are users flattened against the page's linked resources
    Users,
}

impl RecordTransform {
    /// Apply the transform to one page
    ///
    /// `page` is the full response body the rows were extracted from; lookup
    /// tables are built from it and dropped when this call returns.
    pub fn apply(&self, page: &Value, rows: Extracted) -> Result<Vec<JsonObject>> {
        match self {
            Self::Passthrough => rows
                .into_iter()
                .map(|row| match row {
                    Value::Object(map) => Ok(map),
                    other => Err(Error::normalize(format!("expected an object row, got {other}"))),
                })
                .collect(),
            Self::Users => {
                let lookups = UserLookups::from_response(page)?;
                rows.iter()
                    .map(|user| normalize_user(user, &lookups))
                    .collect()
            }
        }
    }
}
