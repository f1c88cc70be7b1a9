//! The chunk → summarize → reduce engine for one transcript.

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::pipeline::chunk::{split, ChunkSize};
use crate::pipeline::prompts::Prompts;
use crate::pipeline::reduce::reduce;
use crate::pipeline::summarize::summarize_chunk;
use crate::traits::backend::SummaryBackend;
use crate::types::{ChunkState, DecisionSummary, Settings, SummaryState, TierLadder};

/// Summarizes transcripts with one backend and a fixed tier ladder.
pub struct SummaryEngine<B> {
    backend: B,
    tiers: TierLadder,
    prompts: Prompts,
    chunk_size: ChunkSize,
}

impl<B: SummaryBackend> SummaryEngine<B> {
    /// Create an engine walking `tiers` in order.
    pub fn new(backend: B, tiers: TierLadder) -> Self {
        Self {
            backend,
            tiers,
            prompts: Prompts::default(),
            chunk_size: ChunkSize::default(),
        }
    }

    /// Build from validated settings.
    pub fn from_settings(backend: B, settings: &Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            backend,
            tiers: settings.tiers.clone(),
            prompts: settings.prompts.clone(),
            chunk_size: settings.chunk_size,
        })
    }

    /// Set the prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the chunk size.
    pub fn with_chunk_size(mut self, size: ChunkSize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Tiers this engine walks.
    pub fn tiers(&self) -> &TierLadder {
        &self.tiers
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    /// Summarize a transcript. Always returns a non-empty text.
    pub async fn summarize(&self, transcript: &str) -> DecisionSummary {
        let mut state = SummaryState::Pending;

        let chunks = split(transcript, self.chunk_size);
        advance(&mut state, SummaryState::Chunked);
        debug!(chunks = chunks.len(), chars = transcript.chars().count(), "Transcript split");

        let mut outcomes = vec![ChunkState::Pending; chunks.len()];
        for (chunk, outcome) in chunks.iter().zip(outcomes.iter_mut()) {
            *outcome = summarize_chunk(&self.backend, &self.tiers, &self.prompts.chunk, chunk).await;
        }
        advance(&mut state, SummaryState::PerChunkDone);

        let summary = reduce(&self.backend, &self.tiers, &self.prompts.reduce, &outcomes).await;
        advance(&mut state, summary.state);

        info!(
            state = ?summary.state,
            chunks = summary.chunk_count,
            exhausted = summary.exhausted_chunks,
            tier = summary.highest_tier.as_ref().map(|t| t.name.as_str()).unwrap_or("-"),
            "Summary finished"
        );

        summary
    }
}

fn advance(state: &mut SummaryState, next: SummaryState) {
    debug!(from = ?state, to = ?next, "Summary state");
    *state = next;
}
