//! Output module
//!
//! Where engine messages go.
//!
//! # Overview
//!
//! This module provides:
//! - `MessageSink` - the trait the stream driver writes through
//! - `SingerWriter` - one JSON message per line on any `Write`
//! - an in-memory sink (`Vec<Message>`) for tests and embedding

mod writer;

pub use writer::{MessageSink, SingerWriter};
