use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Canonicalize extractor output: line endings, typographic quotes, blank runs.
pub fn normalize(raw: &str) -> Result<String> {
    let text: String = raw
        .chars()
        .map(|c| match c {
            '\r' => '\n',
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect();
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(text.to_string())
}
