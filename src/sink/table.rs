use std::io::Write;

use tracing::debug;

use super::Sink;
use crate::entries::{Entries, View};
use crate::error::Result;

pub const HEADER: [&str; 5] = ["month", "day", "title", "verse", "body"];

/// One row per entry, fixed column order.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        CsvSink {
            writer: csv::Writer::from_writer(writer),
        }
    }
}

impl<W: Write> Sink for CsvSink<W> {
    fn write(&mut self, entries: &Entries, view: View) -> Result<usize> {
        self.writer.write_record(HEADER)?;
        let rows = entries.ordered(view);
        for e in &rows {
            let day = e.day.to_string();
            self.writer.write_record([
                e.month.as_str(),
                day.as_str(),
                e.title.as_str(),
                e.verse.as_str(),
                e.body.as_str(),
            ])?;
        }
        self.writer.flush()?;
        debug!(rows = rows.len(), ?view, "wrote csv");
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use crate::settings::StructureSettings;
    use indicatif::ProgressBar;

    fn render(view: View) -> Vec<csv::StringRecord> {
        let entries = parse_document(
            "MAY 2\nTitle, with comma\n\"Quoted\"\nRomans 8:28\npara one\npara two\nMAY 1\nOther",
            &StructureSettings::default(),
            &ProgressBar::hidden(),
        )
        .unwrap();
        let mut out = Vec::new();
        let written = CsvSink::new(&mut out).write(&entries, view).unwrap();
        assert_eq!(written, 2);
        csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(out.as_slice())
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn header_and_columns() {
        let rows = render(View::Flat);
        assert_eq!(rows[0].iter().collect::<Vec<_>>(), HEADER.to_vec());
        assert_eq!(&rows[1][0], "MAY");
        assert_eq!(&rows[1][1], "2");
        assert_eq!(&rows[1][2], "Title, with comma");
        assert_eq!(&rows[1][3], "Quoted \u{2014} Romans 8:28");
        assert_eq!(&rows[1][4], "para one\n\npara two");
    }

    #[test]
    fn grouped_rows_sorted_by_day() {
        let rows = render(View::Grouped);
        assert_eq!(&rows[1][1], "1");
        assert_eq!(&rows[2][1], "2");
    }
}
