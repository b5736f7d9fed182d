//! Source document → raw text, in reading order.
//!
//! PDFs go through `pdf-extract` page by page; pages are joined with a blank
//! line so a page break reads as a paragraph break. Anything else is read as
//! UTF-8 text.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{Error, Result};

pub fn extract_text(path: &Path) -> Result<String> {
    if path.is_dir() {
        return Err(Error::UnsupportedSource {
            path: path.to_path_buf(),
        });
    }

    let text = if is_pdf(path) {
        extract_pdf(path)?
    } else {
        std::fs::read_to_string(path)?
    };

    if text.trim().is_empty() {
        return Err(Error::Extraction {
            path: path.to_path_buf(),
            message: "no text could be extracted".to_string(),
        });
    }
    info!(path = %path.display(), chars = text.len(), "extracted source text");
    Ok(text)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn extract_pdf(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| Error::Extraction {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(pages = pages.len(), "pdf pages extracted");
    Ok(pages.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "JANEIRO 1\nFé").unwrap();
        assert_eq!(extract_text(&path).unwrap(), "JANEIRO 1\nFé");
    }

    #[test]
    fn blank_file_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "  \n\n ").unwrap();
        assert!(matches!(extract_text(&path), Err(Error::Extraction { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(extract_text(&dir.path().join("nope.txt")), Err(Error::Io(_))));
    }

    #[test]
    fn directory_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            extract_text(dir.path()),
            Err(Error::UnsupportedSource { .. })
        ));
    }

    #[test]
    fn broken_pdf_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.PDF");
        std::fs::write(&path, b"not really a pdf").unwrap();
        assert!(matches!(extract_text(&path), Err(Error::Extraction { .. })));
    }
}
