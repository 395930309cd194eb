//! Catalog types

use crate::types::{JsonObject, ReplicationMethod};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Metadata key marking a stream or field as selected
pub const SELECTED_KEY: &str = "selected";

/// One metadata entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Path the metadata applies to; empty for the stream itself
    #[serde(default)]
    pub breadcrumb: Vec<String>,
    /// Metadata values
    #[serde(default)]
    pub metadata: JsonObject,
}

impl MetadataEntry {
    /// Stream-level metadata
    pub fn stream(metadata: JsonObject) -> Self {
        Self {
            breadcrumb: Vec::new(),
            metadata,
        }
    }

    /// Whether this entry applies to the stream itself
    pub fn is_stream_level(&self) -> bool {
        self.breadcrumb.is_empty()
    }
}

/// One stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream identifier
    pub tap_stream_id: String,
    /// Stream name
    pub stream: String,
    /// JSON schema of the records
    pub schema: Value,
    /// Primary key fields
    #[serde(default)]
    pub key_properties: Vec<String>,
    /// Replication key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,
    /// Replication method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_method: Option<ReplicationMethod>,
    /// Stream and field metadata
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

impl CatalogEntry {
    /// Build a discovered entry, selected by default
    pub fn discovered(
        name: &str,
        schema: Value,
        key_properties: Vec<String>,
        replication_key: Option<String>,
    ) -> Self {
        let method = ReplicationMethod::for_key(replication_key.as_deref());

        let mut metadata = JsonObject::new();
        metadata.insert(SELECTED_KEY.to_string(), json!(true));
        metadata.insert("inclusion".to_string(), json!("available"));
        metadata.insert("table-key-properties".to_string(), json!(key_properties));
        metadata.insert("forced-replication-method".to_string(), json!(method));
        if let Some(key) = &replication_key {
            metadata.insert("valid-replication-keys".to_string(), json!([key]));
        }

        Self {
            tap_stream_id: name.to_string(),
            stream: name.to_string(),
            schema,
            key_properties,
            replication_key,
            replication_method: Some(method),
            metadata: vec![MetadataEntry::stream(metadata)],
        }
    }

    /// Whether the stream-level metadata marks this stream as selected
    pub fn is_selected(&self) -> bool {
        self.metadata
            .iter()
            .filter(|m| m.is_stream_level())
            .any(|m| m.metadata.get(SELECTED_KEY) == Some(&Value::Bool(true)))
    }

    /// Set the stream-level selection flag
    pub fn set_selected(&mut self, selected: bool) {
        if let Some(entry) = self.metadata.iter_mut().find(|m| m.is_stream_level()) {
            entry
                .metadata
                .insert(SELECTED_KEY.to_string(), Value::Bool(selected));
            return;
        }
        let mut metadata = JsonObject::new();
        metadata.insert(SELECTED_KEY.to_string(), Value::Bool(selected));
        self.metadata.push(MetadataEntry::stream(metadata));
    }
}

/// A full catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Streams in sync order
    pub streams: Vec<CatalogEntry>,
}
