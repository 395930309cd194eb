//! Record validation against a stream schema
//!
//! Checks types, required properties and `additionalProperties`, recursing
//! into nested objects and array items. Formats are not checked.

use super::types::{JsonSchema, SchemaProperty};
use serde_json::{Map, Value};

/// Validate a record, returning the first violation found
pub fn validate_record(schema: &JsonSchema, record: &Value) -> Result<(), String> {
    let Some(object) = record.as_object() else {
        return Err(format!("expected an object record, found {record}"));
    };
    validate_fields(schema, object)
}

/// Validate the fields of an object record
pub fn validate_fields(schema: &JsonSchema, object: &Map<String, Value>) -> Result<(), String> {
    validate_object(
        "",
        &schema.properties,
        &schema.required,
        schema.additional_properties,
        object,
    )
}

fn validate_object(
    prefix: &str,
    properties: &std::collections::BTreeMap<String, SchemaProperty>,
    required: &[String],
    additional_properties: bool,
    object: &Map<String, Value>,
) -> Result<(), String> {
    for name in required {
        if !object.contains_key(name) {
            return Err(format!("missing required property '{prefix}{name}'"));
        }
    }

    for (name, value) in object {
        let path = format!("{prefix}{name}");
        match properties.get(name) {
            Some(property) => validate_value(&path, property, value)?,
            None if !additional_properties => {
                return Err(format!("unexpected property '{path}'"));
            }
            None => {}
        }
    }

    Ok(())
}

fn validate_value(path: &str, property: &SchemaProperty, value: &Value) -> Result<(), String> {
    if !property.json_type.matches(value) {
        return Err(format!(
            "property '{path}' should be {}, found {value}",
            property.json_type
        ));
    }

    match value {
        Value::Object(object) => {
            if let Some(nested) = &property.properties {
                validate_object(
                    &format!("{path}."),
                    nested,
                    &[],
                    property.additional_properties.unwrap_or(true),
                    object,
                )?;
            }
        }
        Value::Array(items) => {
            if let Some(item_schema) = &property.items {
                for (i, item) in items.iter().enumerate() {
                    validate_value(&format!("{path}[{i}]"), item_schema, item)?;
                }
            }
        }
        _ => {}
    }

    Ok(())
}
