//! Transcript splitting.
//!
//! Chunks are contiguous runs of whole characters; concatenating them in
//! order gives back the transcript byte for byte.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Characters per token for budget estimates.
pub const CHARS_PER_TOKEN: usize = 4;

/// Approximate token count of a string (~4 chars/token, rounded up).
pub fn approx_tokens(text: &str) -> usize {
    approx_tokens_for_chars(text.chars().count())
}

fn approx_tokens_for_chars(chars: usize) -> usize {
    chars.div_ceil(CHARS_PER_TOKEN)
}

/// Maximum chunk length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "unit", content = "value")]
pub enum ChunkSize {
    /// Unicode scalar values
    Chars(NonZeroUsize),
    /// Approximate tokens, converted at [`CHARS_PER_TOKEN`]
    ApproxTokens(NonZeroUsize),
}

impl ChunkSize {
    /// Limit in characters.
    pub fn max_chars(self) -> usize {
        match self {
            Self::Chars(n) => n.get(),
            Self::ApproxTokens(n) => n.get().saturating_mul(CHARS_PER_TOKEN),
        }
    }

    /// Limit in approximate tokens.
    pub fn approx_tokens(self) -> usize {
        match self {
            Self::Chars(n) => approx_tokens_for_chars(n.get()),
            Self::ApproxTokens(n) => n.get(),
        }
    }
}

impl Default for ChunkSize {
    fn default() -> Self {
        Self::Chars(NonZeroUsize::new(24_000).unwrap_or(NonZeroUsize::MIN))
    }
}

/// A slice of a transcript with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Zero-based ordinal
    pub index: usize,
    pub text: &'a str,
}

/// Split `text` into chunks of at most `size` characters.
///
/// An empty transcript yields no chunks.
pub fn split(text: &str, size: ChunkSize) -> Vec<Chunk<'_>> {
    let max_chars = size.max_chars();
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(Chunk {
                index: chunks.len(),
                text: &text[start..offset],
            });
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(Chunk {
            index: chunks.len(),
            text: &text[start..],
        });
    }

    chunks
}
