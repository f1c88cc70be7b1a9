//! Domain types.

pub mod config;
pub mod decision;
pub mod summary;
pub mod tier;

pub use config::{CostAssumptions, FetchSettings, ReportSettings, Settings, DEFAULT_FEED_URL};
pub use decision::{clean_title, extract_case_number, DecisionRecord, FeedEntry, UNKNOWN_CASE_NUMBER};
pub use summary::{
    ChunkState, DecisionSummary, SummaryResult, SummaryState, CHUNK_PLACEHOLDER, NO_DOCUMENT, NO_SUMMARY,
};
pub use tier::{ModelTier, TierLadder, TierRef};
