//! Pre-extracted document text.
//!
//! Accepts the output of external extractors such as `pdftotext`, where
//! pages are separated by form feeds (`\x0c`). Text without form feeds is a
//! single page.

use std::path::Path;

use sitfis_extract_models::PageText;

use crate::{PageSource, PdfError, numbered};

/// Page separator used by `pdftotext`.
pub const FORM_FEED: char = '\x0c';

/// Document text split into pages on form feeds.
#[derive(Debug, Clone)]
pub struct TextPages {
    text: String,
}

impl TextPages {
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Reads a UTF-8 text file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Io`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, PdfError> {
        Ok(Self::from_text(std::fs::read_to_string(path)?))
    }
}

impl PageSource for TextPages {
    fn pages(&self) -> Result<Vec<PageText>, PdfError> {
        let mut texts: Vec<String> = self.text.split(FORM_FEED).map(str::to_string).collect();

        // pdftotext terminates the last page with a form feed too.
        if texts.len() > 1 && texts.last().is_some_and(|t| t.trim().is_empty()) {
            texts.pop();
        }

        Ok(numbered(texts))
    }
}
