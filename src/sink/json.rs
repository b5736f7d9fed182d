use std::io::Write;

use tracing::debug;

use super::Sink;
use crate::entries::{Entries, View};
use crate::error::Result;

/// Pretty JSON: an array of entries (flat) or an object keyed by month (grouped).
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        JsonSink { writer }
    }
}

impl<W: Write> Sink for JsonSink<W> {
    fn write(&mut self, entries: &Entries, view: View) -> Result<usize> {
        match view {
            View::Flat => serde_json::to_writer_pretty(&mut self.writer, entries.flat())?,
            View::Grouped => serde_json::to_writer_pretty(&mut self.writer, &entries.grouped())?,
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        debug!(entries = entries.len(), ?view, "wrote json");
        Ok(entries.len())
    }
}
