//! Synthesis of per-chunk summaries into one narrative.

use tracing::{debug, warn};

use crate::pipeline::prompts::format_reduce_input;
use crate::pipeline::summarize::summarize_with_fallback;
use crate::traits::backend::SummaryBackend;
use crate::types::{ChunkState, DecisionSummary, SummaryState, TierLadder};

/// Combine chunk outcomes into the final summary.
///
/// - no chunk succeeded: reduce is skipped, the summary is a sentinel
/// - reduce succeeded: its text is the summary
/// - reduce failed on every tier: the chunk contributions joined by newlines
///
/// The reduce step runs even for a single chunk.
pub async fn reduce<B>(backend: &B, tiers: &TierLadder, system: &str, chunks: &[ChunkState]) -> DecisionSummary
where
    B: SummaryBackend + ?Sized,
{
    let successes: Vec<_> = chunks.iter().filter_map(ChunkState::result).collect();
    if successes.is_empty() {
        warn!(chunks = chunks.len(), "No chunk produced a summary, skipping reduce");
        return DecisionSummary::failed(chunks.len());
    }

    let exhausted_chunks = chunks.len() - successes.len();
    let mut highest_tier = successes.iter().map(|r| r.tier_used.clone()).max();
    let mut truncated_outputs = successes.iter().filter(|r| r.truncated).count();

    let input = format_reduce_input(chunks.iter().map(ChunkState::contribution));
    debug!(chunks = chunks.len(), input_chars = input.chars().count(), "Reducing chunk summaries");

    match summarize_with_fallback(backend, tiers, system, &input).await {
        Some(result) => {
            if result.truncated {
                truncated_outputs += 1;
            }
            highest_tier = highest_tier.max(Some(result.tier_used));
            DecisionSummary {
                text: result.text,
                state: SummaryState::Reduced,
                highest_tier,
                truncated_outputs,
                chunk_count: chunks.len(),
                exhausted_chunks,
            }
        }
        None => {
            warn!(chunks = chunks.len(), "Reduce failed on every tier, joining chunk summaries");
            let text = chunks
                .iter()
                .map(ChunkState::contribution)
                .collect::<Vec<_>>()
                .join("\n");
            DecisionSummary {
                text,
                state: SummaryState::ReducedDegraded,
                highest_tier,
                truncated_outputs,
                chunk_count: chunks.len(),
                exhausted_chunks,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBackend, MockReply};
    use crate::types::{SummaryResult, TierRef, CHUNK_PLACEHOLDER, NO_SUMMARY};

    fn success(text: &str, rank: usize) -> ChunkState {
        let name = ["gpt-5-nano", "gpt-5-mini", "gpt-5"][rank];
        ChunkState::Success(SummaryResult {
            text: text.to_string(),
            tier_used: TierRef { rank, name: name.to_string() },
            truncated: false,
        })
    }

    #[tokio::test]
    async fn test_zero_successes_skip_reduce() {
        let backend = MockBackend::new().always("gpt-5-nano", MockReply::text("nie benutzt"));
        let tiers = TierLadder::openai_default();

        let summary = reduce(&backend, &tiers, "sys", &[ChunkState::Exhausted, ChunkState::Exhausted]).await;

        assert_eq!(summary.text, NO_SUMMARY);
        assert_eq!(summary.state, SummaryState::Failed);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_truncated_reduce_is_kept_and_counted() {
        let backend = MockBackend::new()
            .reply("gpt-5-nano", MockReply::truncated("Gesamt"))
            .always("gpt-5-mini", MockReply::text("nie benutzt"));
        let tiers = TierLadder::openai_default();

        let summary = reduce(&backend, &tiers, "sys", &[success("A", 0)]).await;

        assert_eq!(summary.text, "Gesamt");
        assert_eq!(summary.state, SummaryState::Reduced);
        assert_eq!(summary.truncated_outputs, 1);
        assert_eq!(backend.models_called(), vec!["gpt-5-nano"]);
    }

    #[tokio::test]
    async fn test_reduce_input_includes_placeholders() {
        let backend = MockBackend::new().reply("gpt-5-nano", MockReply::text("Gesamt."));
        let tiers = TierLadder::openai_default();
        let chunks = [success("A", 0), ChunkState::Exhausted, success("C", 0)];

        let summary = reduce(&backend, &tiers, "sys", &chunks).await;

        assert_eq!(summary.text, "Gesamt.");
        assert_eq!(summary.state, SummaryState::Reduced);
        assert_eq!(summary.exhausted_chunks, 1);
        assert_eq!(
            backend.calls()[0].user,
            format!("A\n\n---\n\n{CHUNK_PLACEHOLDER}\n\n---\n\nC")
        );
    }

    #[tokio::test]
    async fn test_exhausted_reduce_degrades_to_joined_chunks() {
        let backend = MockBackend::new();
        let tiers = TierLadder::openai_default();
        let chunks = [success("A", 0), ChunkState::Exhausted];

        let summary = reduce(&backend, &tiers, "sys", &chunks).await;

        assert_eq!(summary.state, SummaryState::ReducedDegraded);
        assert_eq!(summary.text, format!("A\n{CHUNK_PLACEHOLDER}"));
        assert_eq!(summary.highest_tier.unwrap().name, "gpt-5-nano");
    }

    #[tokio::test]
    async fn test_single_chunk_still_reduced() {
        let backend = MockBackend::new().reply("gpt-5-nano", MockReply::text("Final."));
        let tiers = TierLadder::openai_default();

        let summary = reduce(&backend, &tiers, "sys", &[success("Nur einer.", 0)]).await;

        assert_eq!(summary.text, "Final.");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_highest_tier_spans_chunks_and_reduce() {
        let backend = MockBackend::new().reply("gpt-5-nano", MockReply::text("Final."));
        let tiers = TierLadder::openai_default();

        let summary = reduce(&backend, &tiers, "sys", &[success("A", 0), success("B", 2)]).await;

        let highest = summary.highest_tier.unwrap();
        assert_eq!(highest.name, "gpt-5");
        assert_eq!(highest.rank, 2);
    }
}
