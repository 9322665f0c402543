#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Page text sources for tax-status documents.
//!
//! The extraction pipeline only ever sees an ordered list of
//! [`PageText`]s. This crate produces them from a PDF (pure-Rust text
//! extraction via [`pdf_extract`]) or from text that was extracted
//! elsewhere ([`text::TextPages`]).
//!
//! [`read_documents`] reads the up-to-three documents of a combined report
//! concurrently and fails as a whole if any one of them fails.

pub mod text;

use std::path::{Path, PathBuf};

use sitfis_extract_models::{PageText, SourceDocuments};

/// Errors raised while reading page text.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A background reader task panicked or was cancelled.
    #[error("Reader task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Anything that can produce the page texts of one document.
pub trait PageSource {
    /// Reads every page, in page order.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the document cannot be read.
    fn pages(&self) -> Result<Vec<PageText>, PdfError>;
}

/// A PDF held in memory.
#[derive(Debug, Clone)]
pub struct PdfBytes {
    bytes: Vec<u8>,
}

impl PdfBytes {
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl PageSource for PdfBytes {
    fn pages(&self) -> Result<Vec<PageText>, PdfError> {
        let texts = pdf_extract::extract_text_from_mem_by_pages(&self.bytes)
            .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

        log::debug!(
            "Extracted {} page(s) from {} bytes of PDF",
            texts.len(),
            self.bytes.len()
        );

        Ok(numbered(texts))
    }
}

/// A PDF file on disk.
#[derive(Debug, Clone)]
pub struct PdfFile {
    path: PathBuf,
}

impl PdfFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for PdfFile {
    fn pages(&self) -> Result<Vec<PageText>, PdfError> {
        let bytes = std::fs::read(&self.path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), self.path.display());

        PdfBytes::new(bytes).pages().map_err(|e| match e {
            PdfError::Extraction(msg) => {
                PdfError::Extraction(format!("{}: {msg}", self.path.display()))
            }
            other => other,
        })
    }
}

/// Numbers page texts from 1 in the order given.
pub(crate) fn numbered(texts: Vec<String>) -> Vec<PageText> {
    texts
        .into_iter()
        .zip(1..)
        .map(|(text, page_number)| PageText { page_number, text })
        .collect()
}

/// Paths of the documents for one combined report.
#[derive(Debug, Clone, Default)]
pub struct DocumentPaths {
    /// Tax-status report.
    pub status: Option<PathBuf>,
    /// Active-debt certificate.
    pub certificate: Option<PathBuf>,
    /// CAPAG report.
    pub capag: Option<PathBuf>,
}

/// Reads every supplied document concurrently.
///
/// Files ending in `.txt` are read with [`text::TextPages`]; everything
/// else is treated as a PDF.
///
/// # Errors
///
/// Returns the first [`PdfError`] encountered. No partial result is
/// returned when any document fails.
pub async fn read_documents(paths: DocumentPaths) -> Result<SourceDocuments, PdfError> {
    let (status, certificate, capag) = tokio::try_join!(
        read_optional(paths.status),
        read_optional(paths.certificate),
        read_optional(paths.capag),
    )?;

    Ok(SourceDocuments {
        status,
        certificate,
        capag,
    })
}

async fn read_optional(path: Option<PathBuf>) -> Result<Option<Vec<PageText>>, PdfError> {
    let Some(path) = path else {
        return Ok(None);
    };

    let pages = tokio::task::spawn_blocking(move || read_path(&path)).await??;
    Ok(Some(pages))
}

/// Reads one document, picking the source by file extension.
///
/// # Errors
///
/// Returns [`PdfError`] if the file cannot be read or extracted.
pub fn read_path(path: &Path) -> Result<Vec<PageText>, PdfError> {
    let is_text = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    let pages = if is_text {
        text::TextPages::from_path(path)?.pages()?
    } else {
        PdfFile::new(path).pages()?
    };

    log::info!("Read {} page(s) from {}", pages.len(), path.display());
    Ok(pages)
}
