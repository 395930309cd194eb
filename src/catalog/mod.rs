//! Catalog module
//!
//! Discovery output and sync input. `discover` builds a catalog from the
//! schema registry and the stream descriptors with every stream selected;
//! a catalog read back from a file decides which streams are synced and in
//! which order.

mod types;

pub use types::{Catalog, CatalogEntry, MetadataEntry, SELECTED_KEY};

use crate::error::{Error, Result, ResultExt};
use crate::schema::SchemaRegistry;
use crate::streams::StreamDescriptor;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

impl Catalog {
    /// Build the catalog of every known stream
    pub fn discover(registry: &SchemaRegistry, descriptors: &[StreamDescriptor]) -> Result<Self> {
        let streams = descriptors
            .iter()
            .map(|d| {
                let schema = registry.get(&d.name)?;
                Ok(CatalogEntry::discovered(
                    &d.name,
                    schema.to_json(),
                    d.primary_keys.clone(),
                    d.replication_key.clone(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(streams = streams.len(), "Discovered streams");
        Ok(Self { streams })
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse a catalog from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Invalid catalog: {e}")))?;
        debug!(streams = catalog.streams.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Selected entries, in catalog order
    pub fn selected_streams(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.streams.iter().filter(|s| s.is_selected())
    }

    /// Find an entry by stream id
    pub fn get(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams.iter().find(|s| s.tap_stream_id == tap_stream_id)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests;
