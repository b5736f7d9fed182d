use std::cmp::Reverse;
use std::fmt;

use serde::Serialize;

/// Book names recognized in citations, Portuguese and English forms side by side.
pub const BOOKS: &[&str] = &[
    "Gênesis", "Genesis", "Êxodo", "Exodus", "Levítico", "Leviticus", "Números", "Numbers",
    "Deuteronômio", "Deuteronomy", "Josué", "Joshua", "Juízes", "Judges", "Rute", "Ruth",
    "1 Samuel", "2 Samuel", "1 Reis", "2 Reis", "1 Kings", "2 Kings", "1 Crônicas", "2 Crônicas",
    "1 Chronicles", "2 Chronicles", "Esdras", "Ezra", "Neemias", "Nehemiah", "Ester", "Esther",
    "Jó", "Job", "Salmos", "Salmo", "Psalms", "Psalm", "Provérbios", "Proverbs", "Eclesiastes",
    "Ecclesiastes", "Cântico dos Cânticos", "Cantares", "Song of Solomon", "Isaías", "Isaiah",
    "Jeremias", "Jeremiah", "Lamentações", "Lamentations", "Ezequiel", "Ezekiel", "Daniel",
    "Oséias", "Hosea", "Joel", "Amós", "Amos", "Obadias", "Obadiah", "Jonas", "Jonah",
    "Miquéias", "Micah", "Naum", "Nahum", "Habacuque", "Habakkuk", "Sofonias", "Zephaniah",
    "Ageu", "Haggai", "Zacarias", "Zechariah", "Malaquias", "Malachi", "Mateus", "Matthew",
    "Marcos", "Mark", "Lucas", "Luke", "João", "John", "Atos", "Acts", "Romanos", "Romans",
    "1 Coríntios", "2 Coríntios", "1 Corinthians", "2 Corinthians", "Gálatas", "Galatians",
    "Efésios", "Ephesians", "Filipenses", "Philippians", "Colossenses", "Colossians",
    "1 Tessalonicenses", "2 Tessalonicenses", "1 Thessalonians", "2 Thessalonians",
    "1 Timóteo", "2 Timóteo", "1 Timothy", "2 Timothy", "Tito", "Titus", "Filemom", "Philemon",
    "Hebreus", "Hebrews", "Tiago", "James", "1 Pedro", "2 Pedro", "1 Peter", "2 Peter",
    "1 João", "2 João", "3 João", "1 John", "2 John", "3 John", "Judas", "Jude", "Apocalipse",
    "Revelation",
];

const MAX_NUMBER_DIGITS: usize = 3;

/// A parsed citation such as `1 John 3:16-18`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptureReference {
    /// Book as written in the text (numeric prefix included, whitespace collapsed).
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse_end: Option<u32>,
}

impl fmt::Display for ScriptureReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)?;
        if let Some(end) = self.verse_end {
            write!(f, "-{}", end)?;
        }
        Ok(())
    }
}

/// A citation located in some text; offsets are bytes into that text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceMatch {
    pub start: usize,
    pub end: usize,
    pub reference: ScriptureReference,
}

#[derive(Debug, Clone)]
struct BookName {
    name: String,
    char_len: usize,
}

/// Book catalog ordered longest name first; equal lengths keep catalog order.
#[derive(Debug, Clone)]
pub struct BookCatalog {
    names: Vec<BookName>,
}

impl Default for BookCatalog {
    fn default() -> Self {
        BookCatalog::new(BOOKS)
    }
}

impl BookCatalog {
    pub fn new(names: &[&str]) -> Self {
        let mut names: Vec<BookName> = names
            .iter()
            .map(|n| BookName {
                name: n.to_string(),
                char_len: n.chars().count(),
            })
            .collect();
        names.sort_by_key(|b| Reverse(b.char_len));
        BookCatalog { names }
    }

    /// Catalog names matching at the start of `hay`, longest first, with the bytes
    /// each covers.
    pub fn books_at<'a>(&'a self, hay: &'a str) -> impl Iterator<Item = (&'a str, usize)> + 'a {
        self.names
            .iter()
            .filter_map(move |b| match_name(hay, &b.name).map(|len| (b.name.as_str(), len)))
    }

    pub fn longest_book_at<'a>(&'a self, hay: &'a str) -> Option<(&'a str, usize)> {
        self.books_at(hay).next()
    }

    /// Leftmost citation in `text`.
    pub fn find(&self, text: &str) -> Option<ReferenceMatch> {
        let mut prev: Option<char> = None;
        for (pos, c) in text.char_indices() {
            let at_boundary = prev.map_or(true, |p| !p.is_alphanumeric());
            prev = Some(c);
            if !at_boundary {
                continue;
            }
            if let Some((end, reference)) = self.reference_at(&text[pos..]) {
                return Some(ReferenceMatch {
                    start: pos,
                    end: pos + end,
                    reference,
                });
            }
        }
        None
    }

    /// `[1-3]<ws>` prefix (tried first), book name, `<ws>chapter:verse[-end]`.
    fn reference_at(&self, hay: &str) -> Option<(usize, ScriptureReference)> {
        if let Some(found) = numeric_prefix(hay).and_then(|(digit, len)| {
            let (book_len, chapter, verse, verse_end, total) = self.book_and_numbers(&hay[len..])?;
            let book = format!("{} {}", digit, collapse_whitespace(&hay[len..len + book_len]));
            Some((len + total, ScriptureReference { book, chapter, verse, verse_end }))
        }) {
            return Some(found);
        }

        let (book_len, chapter, verse, verse_end, total) = self.book_and_numbers(hay)?;
        let book = collapse_whitespace(&hay[..book_len]);
        Some((total, ScriptureReference { book, chapter, verse, verse_end }))
    }

    fn book_and_numbers(&self, hay: &str) -> Option<(usize, u32, u32, Option<u32>, usize)> {
        self.books_at(hay).find_map(|(_, book_len)| {
            let (tail_len, chapter, verse, verse_end) = chapter_and_verse(&hay[book_len..])?;
            Some((book_len, chapter, verse, verse_end, book_len + tail_len))
        })
    }
}

/// Case-insensitive match of `name` at the start of `hay`; a space in the name
/// accepts any whitespace run.
fn match_name(hay: &str, name: &str) -> Option<usize> {
    let mut pos = 0;
    for n in name.chars() {
        let c = hay[pos..].chars().next()?;
        if n == ' ' {
            if !c.is_whitespace() {
                return None;
            }
            pos += leading_whitespace(&hay[pos..]);
        } else if c == n || c.to_lowercase().eq(n.to_lowercase()) {
            pos += c.len_utf8();
        } else {
            return None;
        }
    }
    Some(pos)
}

fn numeric_prefix(hay: &str) -> Option<(char, usize)> {
    let digit = hay.chars().next().filter(|c| matches!(c, '1'..='3'))?;
    let ws = leading_whitespace(&hay[1..]);
    if ws == 0 {
        return None;
    }
    Some((digit, 1 + ws))
}

/// `<ws>chapter:verse[-end]`; returns bytes consumed and the numbers.
fn chapter_and_verse(hay: &str) -> Option<(usize, u32, u32, Option<u32>)> {
    let mut pos = leading_whitespace(hay);
    if pos == 0 {
        return None;
    }
    let (chapter, len) = leading_number(&hay[pos..])?;
    pos += len;
    if !hay[pos..].starts_with(':') {
        return None;
    }
    pos += 1;
    let (verse, len) = leading_number(&hay[pos..])?;
    pos += len;

    let mut verse_end = None;
    if hay[pos..].starts_with('-') {
        if let Some((end, len)) = leading_number(&hay[pos + 1..]) {
            verse_end = Some(end);
            pos += 1 + len;
        }
    }
    Some((pos, chapter, verse, verse_end))
}

fn leading_number(s: &str) -> Option<(u32, usize)> {
    let len = s
        .bytes()
        .take(MAX_NUMBER_DIGITS)
        .take_while(|b| b.is_ascii_digit())
        .count();
    if len == 0 {
        return None;
    }
    s[..len].parse().ok().map(|n| (n, len))
}

fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
