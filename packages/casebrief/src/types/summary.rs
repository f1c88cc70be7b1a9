//! Summarization outcomes and their state machines.

use serde::{Deserialize, Serialize};

use super::tier::TierRef;

/// Contribution of a chunk on which every tier failed.
pub const CHUNK_PLACEHOLDER: &str = "[Zusammenfassung für diesen Abschnitt nicht verfügbar]";

/// Final summary when no chunk produced any usable text.
pub const NO_SUMMARY: &str = "⚠️ Keine Antwort vom Modell erhalten.";

/// Summary of a decision that could not be downloaded or read.
pub const NO_DOCUMENT: &str = "Kein Dokument verfügbar.";

/// Usable output from a single tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Trimmed, non-empty text
    pub text: String,

    /// Tier that produced the text
    pub tier_used: TierRef,

    /// The output budget ran out before the model finished
    pub truncated: bool,
}

/// Where a single chunk ended up after the tier ladder.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkState {
    /// Not yet attempted
    Pending,
    /// A tier produced text
    Success(SummaryResult),
    /// Every tier failed
    Exhausted,
}

impl ChunkState {
    /// The text this chunk contributes to the reduce input.
    pub fn contribution(&self) -> &str {
        match self {
            Self::Success(result) => &result.text,
            Self::Pending | Self::Exhausted => CHUNK_PLACEHOLDER,
        }
    }

    /// The successful result, if any.
    pub fn result(&self) -> Option<&SummaryResult> {
        match self {
            Self::Success(result) => Some(result),
            _ => None,
        }
    }
}

/// Per-decision summarization state.
///
/// ```text
/// Pending -> Chunked -> PerChunkDone -> Reduced | ReducedDegraded | Failed
/// ```
///
/// The last three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryState {
    Pending,
    Chunked,
    PerChunkDone,
    /// The reduce step produced the final summary
    Reduced,
    /// Reduce failed; the summary is the joined chunk summaries
    ReducedDegraded,
    /// No chunk produced text; the summary is a sentinel
    Failed,
}

impl SummaryState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Reduced | Self::ReducedDegraded | Self::Failed)
    }
}

/// Everything the engine learned while summarizing one transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSummary {
    /// Final text, never empty
    pub text: String,

    /// Terminal state reached
    pub state: SummaryState,

    /// Most expensive tier used by any step
    pub highest_tier: Option<TierRef>,

    /// Number of accepted outputs that hit the output budget
    pub truncated_outputs: usize,

    /// Number of chunks the transcript was split into
    pub chunk_count: usize,

    /// Number of chunks where every tier failed
    pub exhausted_chunks: usize,
}

impl DecisionSummary {
    /// Summary for a transcript that produced nothing.
    pub fn failed(chunk_count: usize) -> Self {
        Self {
            text: NO_SUMMARY.to_string(),
            state: SummaryState::Failed,
            highest_tier: None,
            truncated_outputs: 0,
            chunk_count,
            exhausted_chunks: chunk_count,
        }
    }
}
