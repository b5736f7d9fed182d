use std::sync::LazyLock;

use regex::Regex;

/// Recognized month tokens with their calendar number. Portuguese first, then English.
pub const MONTHS: &[(&str, u8)] = &[
    ("JANEIRO", 1),
    ("FEVEREIRO", 2),
    ("MARÇO", 3),
    ("MARCO", 3),
    ("ABRIL", 4),
    ("MAIO", 5),
    ("JUNHO", 6),
    ("JULHO", 7),
    ("AGOSTO", 8),
    ("SETEMBRO", 9),
    ("OUTUBRO", 10),
    ("NOVEMBRO", 11),
    ("DEZEMBRO", 12),
    ("JANUARY", 1),
    ("FEBRUARY", 2),
    ("MARCH", 3),
    ("APRIL", 4),
    ("MAY", 5),
    ("JUNE", 6),
    ("JULY", 7),
    ("AUGUST", 8),
    ("SEPTEMBER", 9),
    ("OCTOBER", 10),
    ("NOVEMBER", 11),
    ("DECEMBER", 12),
];

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<&str> = MONTHS.iter().map(|(name, _)| *name).collect();
    Regex::new(&format!(r"(?i)\b({})\s+([0-9]{{1,2}})\b", alternatives.join("|"))).unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMarker {
    /// Month token as written, uppercased.
    pub month: String,
    pub month_number: u8,
    pub day: u32,
    /// Byte offsets of the whole "MONTH DAY" match.
    pub start: usize,
    pub end: usize,
}

/// Text between one marker's end and the next marker's start (or end of text).
#[derive(Debug, Clone)]
pub struct Span<'a> {
    pub marker: DateMarker,
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

pub fn month_number(token: &str) -> Option<u8> {
    let upper = token.to_uppercase();
    MONTHS.iter().find(|(name, _)| *name == upper).map(|(_, n)| *n)
}

/// Date markers in document order. Day numbers outside 1..=31 are not markers.
pub fn locate_markers(text: &str) -> Vec<DateMarker> {
    DATE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let month = caps[1].to_uppercase();
            let day: u32 = caps[2].parse().ok()?;
            if !(1..=31).contains(&day) {
                return None;
            }
            Some(DateMarker {
                month_number: month_number(&month)?,
                month,
                day,
                start: whole.start(),
                end: whole.end(),
            })
        })
        .collect()
}

/// Partition the text after the first marker into one span per marker.
/// Anything before the first marker is dropped.
pub fn split_spans(text: &str) -> Vec<Span<'_>> {
    let markers = locate_markers(text);
    let bounds: Vec<usize> = markers
        .iter()
        .skip(1)
        .map(|m| m.start)
        .chain(std::iter::once(text.len()))
        .collect();

    markers
        .into_iter()
        .zip(bounds)
        .map(|(marker, end)| Span {
            start: marker.end,
            end,
            text: &text[marker.end..end],
            marker,
        })
        .collect()
}
