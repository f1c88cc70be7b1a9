//! Model tiers - the ordered ladder of summarization backends.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// One summarization backend option.
///
/// Rates are USD per one million tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTier {
    /// Model name sent to the backend
    pub name: String,

    /// Per-call output budget in tokens
    pub max_output_tokens: u32,

    /// Total context the model accepts (input + output)
    pub context_window: u32,

    /// Cost per 1M input tokens
    pub input_rate: f64,

    /// Cost per 1M output tokens
    pub output_rate: f64,
}

impl ModelTier {
    /// Create a tier with a 128k context window.
    pub fn new(name: impl Into<String>, max_output_tokens: u32, input_rate: f64, output_rate: f64) -> Self {
        Self {
            name: name.into(),
            max_output_tokens,
            context_window: 128_000,
            input_rate,
            output_rate,
        }
    }

    /// Set the context window.
    pub fn with_context_window(mut self, tokens: u32) -> Self {
        self.context_window = tokens;
        self
    }
}

/// Which tier produced an output, by name and position in the ladder.
///
/// Ordering follows the rank, so `max()` over a set of these is the most
/// expensive tier that was actually used.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TierRef {
    /// Position in the full ladder, 0 = cheapest
    pub rank: usize,

    /// Model name
    pub name: String,
}

impl fmt::Display for TierRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Tiers ordered cheapest/fastest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierLadder {
    tiers: Vec<ModelTier>,
}

impl TierLadder {
    /// Build a ladder from tiers already sorted by cost.
    pub fn new(tiers: Vec<ModelTier>) -> Result<Self, ConfigError> {
        if tiers.is_empty() {
            return Err(ConfigError::EmptyTiers);
        }
        Ok(Self { tiers })
    }

    /// The gpt-5 family with 2025 list prices and a 500-token output budget.
    pub fn openai_default() -> Self {
        Self {
            tiers: vec![
                ModelTier::new("gpt-5-nano", 500, 0.05, 0.40).with_context_window(400_000),
                ModelTier::new("gpt-5-mini", 500, 0.25, 2.00).with_context_window(400_000),
                ModelTier::new("gpt-5", 500, 1.25, 10.00).with_context_window(400_000),
            ],
        }
    }

    /// Index of a tier by name within this ladder.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tiers.iter().position(|t| t.name == name)
    }

    /// Look up a tier by name.
    pub fn get(&self, name: &str) -> Option<&ModelTier> {
        self.tiers.iter().find(|t| t.name == name)
    }

    /// All tiers, cheapest first.
    pub fn tiers(&self) -> &[ModelTier] {
        &self.tiers
    }

    /// Iterate tiers together with their refs, cheapest first.
    pub fn iter(&self) -> impl Iterator<Item = (TierRef, &ModelTier)> {
        self.tiers.iter().enumerate().map(move |(i, tier)| {
            (
                TierRef {
                    rank: i,
                    name: tier.name.clone(),
                },
                tier,
            )
        })
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false; an empty ladder cannot be built.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

impl Default for TierLadder {
    fn default() -> Self {
        Self::openai_default()
    }
}
