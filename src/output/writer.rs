//! Singer message writer
//!
//! Serializes engine messages as JSON lines. Stdout carries nothing else, so
//! all logging goes to stderr.

use crate::engine::Message;
use crate::error::{Error, Result};
use std::io::Write;

/// Destination for engine messages
pub trait MessageSink {
    /// Write one message
    fn emit(&mut self, message: Message) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl MessageSink for Vec<Message> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.push(message);
        Ok(())
    }
}

/// JSON-lines message writer
pub struct SingerWriter<W: Write> {
    /// Underlying writer
    writer: W,
    /// Number of messages written
    messages_written: usize,
}

impl<W: Write> SingerWriter<W> {
    /// Create a new writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            messages_written: 0,
        }
    }

    /// Get the number of messages written so far
    #[must_use]
    pub fn messages_written(&self) -> usize {
        self.messages_written
    }

    /// Consume the writer and return the underlying one
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> MessageSink for SingerWriter<W> {
    fn emit(&mut self, message: Message) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &message).map_err(|e| Error::Output {
            message: format!("Failed to serialize {} message: {e}", message.stream()),
        })?;
        self.writer.write_all(b"\n")?;
        self.messages_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
