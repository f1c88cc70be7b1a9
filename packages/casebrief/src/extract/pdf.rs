//! PDF text extraction.

use std::panic::{self, AssertUnwindSafe};

use tracing::debug;

use crate::error::{ExtractError, ExtractResult};
use crate::traits::extractor::TextExtractor;

/// Extracts the text layer of a PDF with `pdf-extract`.
///
/// Scanned documents without a text layer come back as
/// [`ExtractError::Empty`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, document: &[u8]) -> ExtractResult<String> {
        // The parser panics on some malformed files.
        let text = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(document)))
            .map_err(|_| ExtractError::Pdf("PDF parser panicked".into()))?
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(ExtractError::Empty);
        }

        debug!(bytes = document.len(), chars = text.chars().count(), "PDF text extracted");
        Ok(text)
    }
}
