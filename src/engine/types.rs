//! Engine types
//!
//! Message types, driver phases and configuration for the sync engine.

use crate::types::JsonObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message emitted during sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Stream schema, emitted once before the stream's records
    Schema {
        /// Stream name
        stream: String,
        /// JSON schema of the records
        schema: Value,
        /// Primary key fields
        key_properties: Vec<String>,
        /// Replication key fields
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        bookmark_properties: Vec<String>,
    },
    /// One normalized record
    Record {
        /// Stream name
        stream: String,
        /// The record
        record: JsonObject,
        /// When the page holding the record was fetched
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_extracted: Option<DateTime<Utc>>,
    },
}

impl Message {
    /// Create a schema message
    pub fn schema(
        stream: impl Into<String>,
        schema: Value,
        key_properties: Vec<String>,
        bookmark_properties: Vec<String>,
    ) -> Self {
        Self::Schema {
            stream: stream.into(),
            schema,
            key_properties,
            bookmark_properties,
        }
    }

    /// Create a record message
    pub fn record(
        stream: impl Into<String>,
        record: JsonObject,
        time_extracted: Option<DateTime<Utc>>,
    ) -> Self {
        Self::Record {
            stream: stream.into(),
            record,
            time_extracted,
        }
    }

    /// Stream the message belongs to
    pub fn stream(&self) -> &str {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => stream,
        }
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// The record, for record messages
    pub fn as_record(&self) -> Option<&JsonObject> {
        match self {
            Self::Record { record, .. } => Some(record),
            Self::Schema { .. } => None,
        }
    }
}

/// Stream driver phase
///
/// `Start -> Auth -> FetchPage -> Extract -> Emit -> (FetchPage | Done)`,
/// with `Error` reachable from every non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Schema not yet emitted
    Start,
    /// Acquiring a token
    Auth,
    /// Requesting the next page
    FetchPage,
    /// Pulling rows out of the page
    Extract,
    /// Validating and writing records
    Emit,
    /// Every page processed
    Done,
    /// Stopped on a failure
    Error,
}

impl Phase {
    /// Whether the driver stops in this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Auth => "auth",
            Self::FetchPage => "fetch_page",
            Self::Extract => "extract",
            Self::Emit => "emit",
            Self::Done => "done",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Configuration for sync operation
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Validate each record against the stream schema before emitting
    pub validate_records: bool,
    /// Stamp records with the time their page was fetched
    pub time_extracted: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            validate_records: true,
            time_extracted: true,
        }
    }
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable record validation
    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_records = validate;
        self
    }

    /// Enable or disable `time_extracted`
    #[must_use]
    pub fn with_time_extracted(mut self, stamp: bool) -> Self {
        self.time_extracted = stamp;
        self
    }
}

/// Result of syncing one stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Stream name
    pub stream: String,
    /// Final phase
    pub phase: Phase,
    /// Pages fetched
    pub pages: usize,
    /// Records emitted
    pub records: usize,
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Total records synced
    pub records_synced: usize,
    /// Total pages fetched
    pub pages_fetched: usize,
    /// Total streams synced
    pub streams_synced: usize,
    /// Time spent syncing streams, in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records
    pub fn add_records(&mut self, count: usize) {
        self.records_synced += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Add the time spent on one stream
    pub fn add_duration(&mut self, ms: u64) {
        self.duration_ms += ms;
    }
}
