//! Response extraction module
//!
//! Navigates a parsed response body along a dotted key path (`users`,
//! `linked.departments`) and hands back the rows found there as a tagged
//! `Extracted` value.

mod extractor;
mod types;

pub use extractor::{extract, resolve_path};
pub use types::Extracted;
