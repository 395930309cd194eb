//! Schema module
//!
//! JSON Schema types for the stream definitions, the registry of embedded
//! schemas, and validation of outgoing records.
//!
//! # Features
//!
//! - **Embedded schemas**: `schemas/*.json` compiled into the binary
//! - **Single load**: parsed and checked once, then shared read-only
//! - **Record validation**: types, required and additional properties

mod registry;
mod types;
mod validate;

pub use registry::{SchemaRegistry, BUILTIN_SCHEMAS};
pub use types::{JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
pub use validate::{validate_fields, validate_record};
