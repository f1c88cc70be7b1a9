//! Text extraction trait.

use crate::error::ExtractResult;

/// Turns a downloaded document into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract the full transcript.
    ///
    /// A document without any text is an error, not an empty string.
    fn extract_text(&self, document: &[u8]) -> ExtractResult<String>;
}
