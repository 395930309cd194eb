//! Immutable registry of stream schemas
//!
//! The schema files under `schemas/` are embedded into the binary and parsed
//! once at startup. The registry is then passed by reference to discovery and
//! sync; nothing mutates it afterwards.

use super::types::{JsonSchema, JsonType};
use super::validate::validate_record;
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Embedded schema sources, keyed by stream name
pub const BUILTIN_SCHEMAS: [(&str, &str); 2] = [
    ("users", include_str!("../../schemas/users.json")),
    ("groups", include_str!("../../schemas/groups.json")),
];

/// Stream name to schema
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, JsonSchema>,
}

impl SchemaRegistry {
    /// Load and check the embedded schemas
    pub fn builtin() -> Result<Self> {
        Self::from_sources(BUILTIN_SCHEMAS)
    }

    /// Parse schemas from `(name, json)` pairs
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut schemas = BTreeMap::new();
        for (name, source) in sources {
            let schema: JsonSchema = serde_json::from_str(source)
                .map_err(|e| Error::schema(format!("Invalid schema for '{name}': {e}")))?;
            if schema.json_type != JsonType::Object {
                return Err(Error::schema(format!(
                    "Schema for '{name}' must describe an object, not {}",
                    schema.json_type
                )));
            }
            for required in &schema.required {
                if !schema.properties.contains_key(required) {
                    return Err(Error::schema(format!(
                        "Schema for '{name}' requires undeclared property '{required}'"
                    )));
                }
            }
            debug!(stream = name, properties = schema.properties.len(), "Loaded schema");
            schemas.insert(name.to_string(), schema);
        }
        Ok(Self { schemas })
    }

    /// Schema for a stream
    pub fn get(&self, stream: &str) -> Result<&JsonSchema> {
        self.schemas.get(stream).ok_or_else(|| Error::StreamNotFound {
            stream: stream.to_string(),
        })
    }

    /// Validate a record against a stream's schema
    pub fn validate(&self, stream: &str, record: &Value) -> Result<()> {
        let schema = self.get(stream)?;
        validate_record(schema, record).map_err(|message| Error::schema_validation(stream, message))
    }

    /// Registered stream names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Number of schemas
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
