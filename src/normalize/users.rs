//! Flattening of Pingboard user records

use super::coerce_id;
use super::lookup::{LookupTable, UserLookups};
use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde_json::Value;

/// Scalar fields copied verbatim from the API user
pub const USER_FIELDS: [&str; 11] = [
    "id",
    "created_at",
    "updated_at",
    "first_name",
    "last_name",
    "nickname",
    "start_date",
    "email",
    "job_title",
    "bio",
    "phone",
];

/// Flatten one user into an output record
///
/// `department` and `location` are resolved from the first id under
/// `links.departments` / `links.locations` against the same page's lookup
/// tables. An id the table does not know resolves to `null`.
pub fn normalize_user(user: &Value, lookups: &UserLookups) -> Result<JsonObject> {
    let Some(source) = user.as_object() else {
        return Err(Error::normalize("user is not a JSON object"));
    };

    match source.get("id") {
        None | Some(Value::Null) => return Err(Error::normalize("user has no id")),
        Some(_) => {}
    }

    let mut record = JsonObject::new();
    for field in USER_FIELDS {
        record.insert(
            field.to_string(),
            source.get(field).cloned().unwrap_or(Value::Null),
        );
    }

    let reports_to_id = source.get("reports_to_id").and_then(coerce_id);
    record.insert("reports_to_id".to_string(), reports_to_id.map_or(Value::Null, Value::String));

    let links = source.get("links");
    record.insert(
        "department".to_string(),
        resolve_first_link(links, "departments", &lookups.departments),
    );
    record.insert(
        "location".to_string(),
        resolve_first_link(links, "locations", &lookups.locations),
    );

    Ok(record)
}

/// Resolve the first id of `links.<kind>` to a name, or `null`
fn resolve_first_link(links: Option<&Value>, kind: &str, table: &LookupTable) -> Value {
    links
        .and_then(|links| links.get(kind))
        .and_then(Value::as_array)
        .and_then(|ids| ids.first())
        .and_then(|id| table.resolve(id))
        .map_or(Value::Null, |name| Value::String(name.to_string()))
}
