// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # tap-pingboard
//!
//! A Singer tap that extracts the employee directory from the Pingboard API.
//!
//! ## Features
//!
//! - **OAuth client credentials**: one token per run, cached in memory
//! - **Header token pagination**: follows `X-Next-Page` until it disappears
//! - **Flattened users**: linked departments and locations resolved per page
//! - **Schema validated output**: SCHEMA and RECORD messages as JSON lines
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_pingboard::{cli::{Cli, Runner}, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let cli = Cli::parse_from(["tap-pingboard", "--config", "config.json"]);
//!     Runner::new(cli).run().await
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │   Runner: config → schemas → catalog → streams, one by one   │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────┬────────────┬─────┴──────┬─────────────┬──────────┐
//! │   Auth   │    HTTP    │  Paginate  │   Extract   │  Output  │
//! ├──────────┼────────────┼────────────┼─────────────┼──────────┤
//! │ OAuth2   │ GET + JSON │ X-Next-Page│ key path    │ SCHEMA   │
//! │ client   │ bearer     │ loop guard │ normalize   │ RECORD   │
//! │ creds    │            │            │ validate    │          │
//! └──────────┴────────────┴────────────┴─────────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// OAuth client-credentials authentication
pub mod auth;

/// HTTP client
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Record extraction from response bodies
pub mod extract;

/// Record normalization
pub mod normalize;

/// Stream schemas and validation
pub mod schema;

/// Stream descriptors
pub mod streams;

/// Discovery catalog
pub mod catalog;

/// Stream driver
pub mod engine;

/// Message output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
