//! Persisting downloaded documents.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::FetchResult;

/// File name for a decision document: `<case number>_<YYYY-MM-DD>.pdf`,
/// dated with the day it was downloaded.
///
/// Anything outside `[A-Za-z0-9-]` in the case number becomes `_`, with
/// runs collapsed.
pub fn document_file_name(case_number: &str, downloaded_at: &DateTime<FixedOffset>) -> String {
    let mut sanitized = String::with_capacity(case_number.len());
    for c in case_number.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            sanitized.push(c);
        } else if !sanitized.ends_with('_') {
            sanitized.push('_');
        }
    }
    let sanitized = sanitized.trim_matches('_');
    let sanitized = if sanitized.is_empty() { "document" } else { sanitized };

    format!("{}_{}.pdf", sanitized, downloaded_at.format("%Y-%m-%d"))
}

/// Hex SHA-256 of a document.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Write a document into `dir`, replacing any earlier file of the same name.
pub async fn save_document(
    dir: &Path,
    case_number: &str,
    downloaded_at: &DateTime<FixedOffset>,
    bytes: &[u8],
) -> FetchResult<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let path = dir.join(document_file_name(case_number, downloaded_at));
    tokio::fs::write(&path, bytes).await?;

    info!(
        path = %path.display(),
        bytes = bytes.len(),
        sha256 = %content_hash(bytes),
        "Document saved"
    );

    Ok(path)
}
