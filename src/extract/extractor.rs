//! Dotted key path resolution over parsed response bodies

use super::types::Extracted;
use crate::error::{Error, Result};
use serde_json::Value;

/// Resolve a dotted key path (`linked.departments`) against a JSON body
///
/// Object nodes are navigated key by key; a missing key is an error. When a
/// non-object node is reached before the path is exhausted, navigation stops
/// there and that node is returned.
pub fn resolve_path<'a>(body: &'a Value, key_path: &str) -> Result<&'a Value> {
    let mut current = body;
    for key in key_path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(key).ok_or_else(|| {
                    Error::extraction(key_path, format!("key '{key}' not found"))
                })?;
            }
            _ => break,
        }
    }
    Ok(current)
}

/// Select the rows of interest from a response body
///
/// With no key path the whole body is used. An object yields
/// `Extracted::Single`, an array `Extracted::Many`; anything else is an error.
pub fn extract(body: &Value, key_path: Option<&str>) -> Result<Extracted> {
    let path = key_path.filter(|p| !p.is_empty());
    let value = match path {
        Some(path) => resolve_path(body, path)?,
        None => body,
    };

    match value {
        Value::Object(_) => Ok(Extracted::Single(value.clone())),
        Value::Array(rows) => Ok(Extracted::Many(rows.clone())),
        other => Err(Error::extraction(
            path.unwrap_or("<root>"),
            format!("expected an object or an array, found {}", type_name(other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
