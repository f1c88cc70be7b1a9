//! Weekly Court Decision Digests
//!
//! Fetches recently published decisions from a court's RSS feed, downloads
//! their PDF documents, summarizes them with a chunked map/reduce over an
//! ordered ladder of LLM tiers, and renders a weekly PDF report.
//!
//! # Design
//!
//! - Tiers are tried cheapest first; any failure falls through to the next
//! - Truncated answers are kept and flagged, never escalated
//! - Every decision in the report has a non-empty summary
//! - Collaborators sit behind traits so runs can be tested offline
//!
//! # Usage
//!
//! ```rust,ignore
//! use casebrief::{Pipeline, Settings, HttpSource, ScoredLinkLocator, PdfTextExtractor};
//! use casebrief::ai::OpenAIBackend;
//!
//! let settings = Settings::default();
//! let pipeline = Pipeline::new(
//!     HttpSource::from_settings(&settings.fetch)?,
//!     OpenAIBackend::from_env()?,
//!     PdfTextExtractor::new(),
//!     ScoredLinkLocator::new(&settings.fetch.document_href_pattern),
//!     settings,
//! )?;
//!
//! let summary = pipeline.run().await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Collaborator seams (backend, source, extractor, link locator)
//! - [`types`] - Decision records, tiers, summary states, settings
//! - [`pipeline`] - Chunking, tiered summarization, reduce, cost, run driver
//! - [`fetch`] - RSS feed, detail pages, document links, downloads
//! - [`extract`] - PDF text and headnote extraction
//! - [`report`] - Report model, layout and PDF rendering
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod report;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{BackendError, ConfigError, DigestError, ExtractError, FetchError, ReportError, SkipReason};
pub use traits::{
    backend::{Completion, CompletionRequest, SummaryBackend},
    extractor::TextExtractor,
    locator::LinkLocator,
    source::DecisionSource,
};
pub use types::{
    ChunkState, DecisionRecord, DecisionSummary, FeedEntry, ModelTier, Settings, SummaryResult, SummaryState,
    TierLadder, TierRef,
};

pub use extract::PdfTextExtractor;
pub use fetch::{HttpSource, ScoredLinkLocator};
pub use pipeline::{ChunkSize, Pipeline, Prompts, RunSummary, SummaryEngine};
pub use report::{write_report, ReportMeta};
