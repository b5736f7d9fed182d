use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use crate::parser::books::ScriptureReference;
use crate::parser::markers::DateMarker;
use crate::parser::structure::Strategy;

/// One dated reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub month: String,
    #[serde(skip)]
    pub month_number: u8,
    pub day: u32,
    pub title: String,
    pub verse_text: String,
    pub reference: Option<ScriptureReference>,
    /// Verse text and citation as one display string.
    pub verse: String,
    pub body: String,
    #[serde(skip)]
    pub strategy: Option<Strategy>,
}

impl Entry {
    pub fn new(
        marker: &DateMarker,
        title: String,
        verse_text: String,
        reference: Option<ScriptureReference>,
        body: String,
        strategy: Option<Strategy>,
    ) -> Self {
        let verse = match &reference {
            Some(r) => format!("{} \u{2014} {}", verse_text, r).trim().to_string(),
            None => verse_text.trim().to_string(),
        };
        Entry {
            month: marker.month.clone(),
            month_number: marker.month_number,
            day: marker.day,
            title,
            verse_text,
            reference,
            verse,
            body,
            strategy,
        }
    }
}

/// Output shape requested by a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Flat,
    Grouped,
}

/// Canonical entry sequence in document order. Both views read from it.
#[derive(Debug, Clone, Default)]
pub struct Entries {
    entries: Vec<Entry>,
}

impl Entries {
    pub fn new(entries: Vec<Entry>) -> Self {
        Entries { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn flat(&self) -> &[Entry] {
        &self.entries
    }

    /// Months in order of first appearance; days ascending within a month, ties
    /// keep document order.
    pub fn grouped(&self) -> IndexMap<&str, Vec<&Entry>> {
        let mut groups: IndexMap<&str, Vec<&Entry>> = IndexMap::new();
        for entry in &self.entries {
            groups.entry(entry.month.as_str()).or_default().push(entry);
        }
        for days in groups.values_mut() {
            days.sort_by_key(|e| e.day);
        }
        groups
    }

    /// Entries in the order the given view presents them.
    pub fn ordered(&self, view: View) -> Vec<&Entry> {
        match view {
            View::Flat => self.entries.iter().collect(),
            View::Grouped => self.grouped().into_values().flatten().collect(),
        }
    }

    pub fn count_by_month(&self) -> IndexMap<&str, usize> {
        self.grouped()
            .into_iter()
            .map(|(month, days)| (month, days.len()))
            .collect()
    }

    pub fn count_by_strategy(&self) -> Vec<(Option<Strategy>, usize)> {
        self.entries
            .iter()
            .map(|e| e.strategy)
            .counts()
            .into_iter()
            .sorted()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(month: &str, day: u32, title: &str) -> Entry {
        let marker = DateMarker {
            month: month.to_string(),
            month_number: crate::parser::markers::month_number(month).unwrap_or(0),
            day,
            start: 0,
            end: 0,
        };
        Entry::new(&marker, title.to_string(), String::new(), None, String::new(), None)
    }

    fn sample() -> Entries {
        Entries::new(vec![
            entry("MAIO", 3, "a"),
            entry("JUNHO", 1, "b"),
            entry("MAIO", 1, "c"),
            entry("MAIO", 3, "d"),
            entry("MAIO", 2, "e"),
        ])
    }

    #[test]
    fn flat_keeps_document_order() {
        let entries = sample();
        let titles: Vec<&str> = entries.flat().iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn grouped_sorts_days_and_keeps_month_appearance_order() {
        let entries = sample();
        let grouped = entries.grouped();
        let months: Vec<&str> = grouped.keys().copied().collect();
        assert_eq!(months, vec!["MAIO", "JUNHO"]);

        let maio: Vec<(u32, &str)> = grouped["MAIO"].iter().map(|e| (e.day, e.title.as_str())).collect();
        assert_eq!(maio, vec![(1, "c"), (2, "e"), (3, "a"), (3, "d")]);

        for days in grouped.values() {
            assert!(days.windows(2).all(|w| w[0].day <= w[1].day));
        }
    }

    #[test]
    fn views_hold_the_same_entries() {
        let entries = sample();
        let flat = entries.ordered(View::Flat);
        let grouped = entries.ordered(View::Grouped);
        assert_eq!(flat.len(), grouped.len());
        for e in &flat {
            assert!(grouped.iter().any(|g| std::ptr::eq(*g, *e)));
        }
    }

    #[test]
    fn counts() {
        let entries = sample();
        let by_month: Vec<(&str, usize)> = entries.count_by_month().into_iter().collect();
        assert_eq!(by_month, vec![("MAIO", 4), ("JUNHO", 1)]);
        assert_eq!(entries.count_by_strategy(), vec![(None, 5)]);
    }

    #[test]
    fn composed_verse() {
        let marker = DateMarker {
            month: "JANUARY".to_string(),
            month_number: 1,
            day: 1,
            start: 0,
            end: 0,
        };
        let reference = ScriptureReference {
            book: "John".to_string(),
            chapter: 3,
            verse: 16,
            verse_end: None,
        };
        let e = Entry::new(
            &marker,
            "Faith".to_string(),
            "God is good.".to_string(),
            Some(reference),
            String::new(),
            None,
        );
        assert_eq!(e.verse, "God is good. \u{2014} John 3:16");
    }
}
