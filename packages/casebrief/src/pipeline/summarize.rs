//! Tiered fallback for a single summarization request.
//!
//! Tiers are tried cheapest first. The first call that yields non-empty text
//! wins; errors, unreachable backends and empty answers all mean "try the
//! next tier". A truncated answer is kept and flagged.

use tracing::{debug, warn};

use crate::error::BackendError;
use crate::pipeline::chunk::Chunk;
use crate::traits::backend::{CompletionRequest, SummaryBackend};
use crate::types::{ChunkState, SummaryResult, TierLadder};

/// Walk the ladder until one tier produces text.
///
/// Returns `None` when every tier failed. Never retries a tier.
pub async fn summarize_with_fallback<B>(
    backend: &B,
    tiers: &TierLadder,
    system: &str,
    content: &str,
) -> Option<SummaryResult>
where
    B: SummaryBackend + ?Sized,
{
    for (tier_ref, tier) in tiers.iter() {
        debug!(tier = %tier_ref, "Trying tier");

        let request = CompletionRequest::new(&tier.name, system, content)
            .with_max_output_tokens(tier.max_output_tokens);

        let outcome = backend.complete(request).await.and_then(|completion| {
            let text = completion.text.trim();
            if text.is_empty() {
                Err(BackendError::EmptyContent)
            } else {
                Ok((text.to_string(), completion.truncated))
            }
        });

        match outcome {
            Ok((text, truncated)) => {
                if truncated {
                    warn!(
                        tier = %tier_ref,
                        max_output_tokens = tier.max_output_tokens,
                        "Output hit the token limit, keeping truncated text"
                    );
                }
                return Some(SummaryResult {
                    text,
                    tier_used: tier_ref,
                    truncated,
                });
            }
            Err(e) => {
                warn!(tier = %tier_ref, error = %e, "Tier failed, trying next");
            }
        }
    }

    None
}

/// Summarize one chunk with the per-chunk instruction.
pub async fn summarize_chunk<B>(backend: &B, tiers: &TierLadder, system: &str, chunk: &Chunk<'_>) -> ChunkState
where
    B: SummaryBackend + ?Sized,
{
    match summarize_with_fallback(backend, tiers, system, chunk.text).await {
        Some(result) => {
            debug!(chunk = chunk.index, tier = %result.tier_used, "Chunk summarized");
            ChunkState::Success(result)
        }
        None => {
            warn!(chunk = chunk.index, tiers = tiers.len(), "All tiers failed for chunk");
            ChunkState::Exhausted
        }
    }
}
