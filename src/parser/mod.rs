pub mod books;
pub mod markers;
pub mod normalize;
pub mod structure;

use indicatif::ProgressBar;
use tracing::info;

use crate::entries::{Entries, Entry};
use crate::error::Result;
use crate::settings::StructureSettings;
use markers::Span;
use structure::Structurer;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

const CHUNK_SIZE: usize = 500;

/// Three-stage pipeline: raw text → normalized text → spans → entries.
/// No date markers yields an empty sequence, not an error.
pub fn parse_document(
    raw: &str,
    settings: &StructureSettings,
    progress: &ProgressBar,
) -> Result<Entries> {
    let text = normalize::normalize(raw)?;
    let spans = markers::split_spans(&text);
    info!(markers = spans.len(), chars = text.len(), "located date markers");

    let structurer = Structurer::new(settings);
    progress.set_length(spans.len() as u64);
    let mut entries = Vec::with_capacity(spans.len());
    for chunk in spans.chunks(CHUNK_SIZE) {
        entries.extend(structure_spans(&structurer, chunk));
        progress.inc(chunk.len() as u64);
    }
    progress.finish_and_clear();

    Ok(Entries::new(entries))
}

#[cfg(feature = "rayon")]
fn structure_spans(structurer: &Structurer, spans: &[Span<'_>]) -> Vec<Entry> {
    spans
        .par_iter()
        .map(|s| structurer.structure(&s.marker, s.text.trim()))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn structure_spans(structurer: &Structurer, spans: &[Span<'_>]) -> Vec<Entry> {
    spans
        .iter()
        .map(|s| structurer.structure(&s.marker, s.text.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::structure::Strategy;

    fn parse(raw: &str) -> Result<Entries> {
        parse_document(raw, &StructureSettings::default(), &ProgressBar::hidden())
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn single_entry_scenario() {
        let entries = parse("JANEIRO 1\nFaith\nGod is good.\nJohn 3:16\nMore text here.").unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries.flat()[0];
        assert_eq!(e.month, "JANEIRO");
        assert_eq!(e.day, 1);
        assert_eq!(e.title, "Faith");
        assert_eq!(e.verse_text, "God is good.");
        assert_eq!(e.reference.as_ref().unwrap().to_string(), "John 3:16");
        assert_eq!(e.verse, "God is good. \u{2014} John 3:16");
        assert_eq!(e.body, "More text here.");
    }

    #[test]
    fn no_markers_is_empty_not_error() {
        let entries = parse("A book preface with no dated headers at all.").unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn empty_input_is_error() {
        assert!(matches!(parse("  \r\n "), Err(Error::EmptyInput)));
    }

    #[test]
    fn title_only_entry() {
        let entries = parse("MARCH 4\nStand Firm").unwrap();
        let e = &entries.flat()[0];
        assert_eq!(e.title, "Stand Firm");
        assert_eq!(e.verse, "");
        assert_eq!(e.body, "");
    }

    #[test]
    fn entry_count_matches_marker_count() {
        let raw = fixture("janeiro");
        let text = normalize::normalize(&raw).unwrap();
        let markers = markers::locate_markers(&text);
        let entries = parse(&raw).unwrap();
        assert_eq!(entries.len(), markers.len());
    }

    #[test]
    fn janeiro_fixture() {
        let entries = parse(&fixture("janeiro")).unwrap();
        assert_eq!(entries.len(), 5);

        let days: Vec<u32> = entries.flat().iter().map(|e| e.day).collect();
        assert_eq!(days, vec![1, 2, 3, 5, 4]);

        let first = &entries.flat()[0];
        assert_eq!(first.title, "Comece com fé");
        assert_eq!(first.verse_text, "Porque Deus amou o mundo de tal maneira que deu o seu Filho unigênito.");
        assert_eq!(first.reference.as_ref().unwrap().to_string(), "João 3:16");
        assert_eq!(first.strategy, Some(Strategy::Inline));
        assert!(first.body.starts_with("Cada manhã"));
        assert!(first.body.contains("\n\n"));

        let second = &entries.flat()[1];
        assert_eq!(second.strategy, Some(Strategy::Split));
        assert_eq!(second.verse_text, "O Senhor é o meu pastor; nada me faltará.");
        assert_eq!(second.reference.as_ref().unwrap().to_string(), "Salmos 23:1");

        let third = &entries.flat()[2];
        assert!(third.reference.is_none());
        assert_eq!(third.verse, "");

        let grouped = entries.grouped();
        let janeiro_days: Vec<u32> = grouped["JANEIRO"].iter().map(|e| e.day).collect();
        assert_eq!(janeiro_days, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn english_fixture_with_typographic_quotes() {
        let entries = parse(&fixture("january")).unwrap();
        assert_eq!(entries.len(), 3);
        let e = &entries.flat()[0];
        assert_eq!(e.month, "JANUARY");
        assert_eq!(e.title, "The Promise Keeper");
        assert_eq!(e.verse_text, "Fear thou not; for I am with thee.");
        assert_eq!(e.reference.as_ref().unwrap().to_string(), "Isaiah 41:10");

        let range = &entries.flat()[1];
        assert_eq!(range.reference.as_ref().unwrap().verse_end, Some(6));
        assert_eq!(range.reference.as_ref().unwrap().book, "Proverbs");

        let numbered = &entries.flat()[2];
        assert_eq!(numbered.reference.as_ref().unwrap().book, "1 Peter");
    }
}
