//! Text extraction from decision documents.

pub mod headnote;
pub mod pdf;

pub use headnote::extract_headnote;
pub use pdf::PdfTextExtractor;
