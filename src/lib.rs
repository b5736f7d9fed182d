//! Splits the extracted text of a daily devotional (one reading per calendar day)
//! into dated entries carrying a title, a verse with its citation, and a body.

pub mod entries;
pub mod error;
pub mod extract;
pub mod parser;
pub mod settings;
pub mod sink;

pub use entries::{Entries, Entry, View};
pub use error::{Error, Result};
pub use parser::parse_document;
pub use settings::Settings;
