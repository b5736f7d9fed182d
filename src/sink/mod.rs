pub mod db;
pub mod json;
pub mod table;

use crate::entries::{Entries, View};
use crate::error::Result;

/// Consumer of a finished entry sequence.
pub trait Sink {
    fn write(&mut self, entries: &Entries, view: View) -> Result<usize>;
}

pub use db::SqliteSink;
pub use json::JsonSink;
pub use table::CsvSink;
