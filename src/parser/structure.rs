use serde::Serialize;
use tracing::debug;

use super::books::{BookCatalog, ReferenceMatch, ScriptureReference};
use super::markers::DateMarker;
use crate::entries::Entry;
use crate::settings::StructureSettings;

/// Residue left around a verse once its citation is cut out.
const VERSE_TRIM: &[char] = &[' ', '-', '\u{2013}', '\u{2014}', ':', ';'];

/// Which heuristic located the verse and its citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Citation on a line shortly after the title; verse is everything before it.
    Inline,
    /// A quoted line immediately followed by a citation line.
    Split,
    /// Citation found anywhere in the span.
    Fallback,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Inline => "inline",
            Strategy::Split => "split",
            Strategy::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerseMatch {
    pub strategy: Strategy,
    pub verse_text: String,
    pub reference: ScriptureReference,
    /// First line belonging to the verse+citation block (the quote line for `Split`).
    pub first_line: usize,
    /// Line holding the citation.
    pub reference_line: usize,
    pub body_start: usize,
}

/// Turns one span into an [`Entry`]. Line indices are into the span's non-empty
/// trimmed lines, with the title at index 0.
#[derive(Debug, Clone)]
pub struct Structurer {
    catalog: BookCatalog,
    settings: StructureSettings,
    quote_chars: Vec<char>,
}

impl Structurer {
    pub fn new(settings: &StructureSettings) -> Self {
        Structurer::with_catalog(settings, BookCatalog::default())
    }

    pub fn with_catalog(settings: &StructureSettings, catalog: BookCatalog) -> Self {
        let mut quote_chars: Vec<char> = settings.quote_chars.chars().collect();
        if quote_chars.is_empty() {
            quote_chars.push('"');
        }
        Structurer {
            catalog,
            settings: settings.clone(),
            quote_chars,
        }
    }

    pub fn structure(&self, marker: &DateMarker, span: &str) -> Entry {
        let lines: Vec<&str> = span
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let title = lines
            .first()
            .map(|t| {
                t.trim_matches(|c: char| c == '\'' || self.is_quote(c))
                    .trim()
                    .to_string()
            })
            .unwrap_or_default();

        let found = self.locate_verse(&lines);
        let body_start = found.as_ref().map_or(1, |m| m.body_start);
        let body = lines
            .get(body_start..)
            .unwrap_or_default()
            .join("\n\n")
            .trim()
            .to_string();

        debug!(
            month = %marker.month,
            day = marker.day,
            strategy = ?found.as_ref().map(|m| m.strategy),
            "structured entry"
        );

        let (verse_text, reference, strategy) = match found {
            Some(m) => (m.verse_text, Some(m.reference), Some(m.strategy)),
            None => (String::new(), None, None),
        };
        Entry::new(marker, title, verse_text, reference, body, strategy)
    }

    /// Inline and split candidates compete: the split pair wins only when its quote
    /// line comes before the inline citation. The whole-span search runs last.
    pub fn locate_verse(&self, lines: &[&str]) -> Option<VerseMatch> {
        match (self.inline_reference(lines), self.split_reference(lines)) {
            (Some(inline), Some(split)) => {
                if split.first_line < inline.reference_line {
                    Some(split)
                } else {
                    Some(inline)
                }
            }
            (inline, split) => inline
                .or(split)
                .or_else(|| self.whole_span_reference(lines)),
        }
    }

    /// First line after the title (within the lookahead window) carrying a citation.
    pub fn inline_reference(&self, lines: &[&str]) -> Option<VerseMatch> {
        let limit = lines.len().min(self.settings.inline_window);
        (1..limit).find_map(|i| {
            let m = self.catalog.find(lines[i])?;
            let mut segment: Vec<String> = lines[1..i].iter().map(|l| l.to_string()).collect();
            segment.push(cut_reference(lines[i], &m, lines[i]));
            Some(VerseMatch {
                strategy: Strategy::Inline,
                verse_text: self.clean_verse(&segment.join(" ")),
                reference: m.reference,
                first_line: i,
                reference_line: i,
                body_start: i + 1,
            })
        })
    }

    /// A line with a quoted passage directly followed by a citation line.
    pub fn split_reference(&self, lines: &[&str]) -> Option<VerseMatch> {
        let limit = lines.len().saturating_sub(1).min(self.settings.split_window);
        (1..limit).find_map(|i| {
            let quoted = self.quoted(lines[i])?;
            let m = self.catalog.find(lines[i + 1])?;
            Some(VerseMatch {
                strategy: Strategy::Split,
                verse_text: quoted.trim().to_string(),
                reference: m.reference,
                first_line: i,
                reference_line: i + 1,
                body_start: i + 2,
            })
        })
    }

    /// Citation anywhere after the title, possibly broken across lines. The verse
    /// is a short window of lines ending where the citation starts.
    pub fn whole_span_reference(&self, lines: &[&str]) -> Option<VerseMatch> {
        let rest = lines.get(1..)?;
        let joined = rest.join("\n");
        let m = self.catalog.find(&joined)?;

        // byte offset of each remaining line inside `joined`
        let mut offsets = Vec::with_capacity(rest.len());
        let mut offset = 0;
        for line in rest {
            offsets.push(offset);
            offset += line.len() + 1;
        }
        let line_of = |pos: usize| offsets.partition_point(|&o| o <= pos).saturating_sub(1);
        let first = line_of(m.start);
        let last = line_of(m.end.saturating_sub(1));

        let window_start = (first + 1).saturating_sub(self.settings.fallback_context.max(1));
        let mut segment: Vec<String> = rest[window_start..first].iter().map(|l| l.to_string()).collect();
        let local = ReferenceMatch {
            start: m.start - offsets[first],
            end: m.end - offsets[last],
            reference: m.reference.clone(),
        };
        segment.push(cut_reference(rest[first], &local, rest[last]));

        Some(VerseMatch {
            strategy: Strategy::Fallback,
            verse_text: self.clean_verse(&segment.join(" ")),
            reference: m.reference,
            first_line: first + 1,
            reference_line: first + 1,
            body_start: last + 2,
        })
    }

    fn is_quote(&self, c: char) -> bool {
        self.quote_chars.contains(&c)
    }

    /// Shortest non-empty text between an opening quote and the next quote.
    fn quoted<'a>(&self, line: &'a str) -> Option<&'a str> {
        let (open, c) = line.char_indices().find(|(_, c)| self.is_quote(*c))?;
        let inner = &line[open + c.len_utf8()..];
        let first = inner.chars().next()?;
        let close = inner[first.len_utf8()..].find(|c: char| self.is_quote(c))?;
        Some(&inner[..first.len_utf8() + close])
    }

    fn clean_verse(&self, text: &str) -> String {
        text.trim_matches(VERSE_TRIM)
            .trim_matches(|c: char| self.is_quote(c))
            .trim()
            .to_string()
    }
}

/// Text of `first_line` before the citation joined with `last_line` after it,
/// trimmed of the separators that usually sit around a citation.
fn cut_reference(first_line: &str, m: &ReferenceMatch, last_line: &str) -> String {
    let before = &first_line[..m.start];
    let after = &last_line[m.end..];
    format!("{}{}", before, after).trim_matches(VERSE_TRIM).to_string()
}
