//! Common types used throughout tap-pingboard
//!
//! Shared type aliases and small enums used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Replication Method
// ============================================================================

/// How a stream is replicated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicationMethod {
    /// Fetch everything on every run
    FullTable,
    /// Ordered by a replication key
    #[default]
    Incremental,
}

impl ReplicationMethod {
    /// Pick the method implied by an optional replication key
    pub fn for_key(replication_key: Option<&str>) -> Self {
        if replication_key.is_some() {
            Self::Incremental
        } else {
            Self::FullTable
        }
    }
}
