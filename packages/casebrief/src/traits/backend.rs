//! Summarization backend trait.

use async_trait::async_trait;

use crate::error::BackendResult;

/// One summarization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    /// Model name of the tier being tried
    pub model: String,

    /// System instruction
    pub system: String,

    /// Content to summarize
    pub user: String,

    /// Output budget for this tier
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            user: user.into(),
            max_output_tokens: 500,
        }
    }

    /// Set the output budget.
    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = tokens;
        self
    }
}

/// What a backend call returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Raw text, possibly empty or padded with whitespace
    pub text: String,

    /// Generation stopped because the output budget ran out
    pub truncated: bool,
}

impl Completion {
    /// A complete answer.
    pub fn stop(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            truncated: false,
        }
    }

    /// An answer cut off at the output budget.
    pub fn truncated(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            truncated: true,
        }
    }
}

/// A chat-style LLM that turns an instruction and content into text.
///
/// Implementations report every failure as an error and never retry; the
/// engine decides whether to fall through to the next tier.
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Run one completion against `request.model`.
    async fn complete(&self, request: CompletionRequest) -> BackendResult<Completion>;
}
