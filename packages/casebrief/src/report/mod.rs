//! Weekly report rendering.
//!
//! ```text
//! records + meta ──build_story──► [Block] ──Layout──► [Page] ──render_pdf──► bytes
//! ```

pub mod format;
pub mod hyphenate;
pub mod layout;
pub mod model;
pub mod pdf;

pub use format::{format_published, report_file_name};
pub use hyphenate::GermanHyphenator;
pub use layout::{Geometry, Layout, Page};
pub use model::{build_story, Block, ReportMeta};
pub use pdf::{render_pdf, ReportFont};

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::ReportResult;
use crate::types::{DecisionRecord, ReportSettings};

/// Render the report to PDF bytes.
pub fn render_report(records: &[DecisionRecord], meta: &ReportMeta, settings: &ReportSettings) -> ReportResult<Vec<u8>> {
    let story = build_story(records, meta, settings);

    let hyphenator = if settings.hyphenate {
        match GermanHyphenator::new() {
            Ok(h) => Some(h),
            Err(e) => {
                warn!(error = %e, "Hyphenation disabled");
                None
            }
        }
    } else {
        None
    };

    let geometry = Geometry::default();
    let pages = Layout::new(geometry, hyphenator.as_ref()).run(&story);
    let font = ReportFont::load(settings.font_path.as_deref());

    render_pdf(&pages, &settings.title, geometry, &font)
}

/// Where the report for `meta.generated_at` is written.
pub fn report_path(meta: &ReportMeta, settings: &ReportSettings) -> PathBuf {
    settings
        .output_dir
        .join(report_file_name(&settings.file_prefix, &meta.generated_at))
}

/// Render the report and write it into the report directory.
pub async fn write_report(
    records: &[DecisionRecord],
    meta: &ReportMeta,
    settings: &ReportSettings,
) -> ReportResult<PathBuf> {
    let bytes = render_report(records, meta, settings)?;

    tokio::fs::create_dir_all(&settings.output_dir).await?;
    let path = report_path(meta, settings);
    tokio::fs::write(&path, &bytes).await?;

    info!(path = %path.display(), decisions = records.len(), bytes = bytes.len(), "Report written");
    Ok(path)
}
