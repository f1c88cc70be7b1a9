//! OpenAI implementation of the summarization backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use casebrief::ai::OpenAIBackend;
//!
//! let backend = OpenAIBackend::from_env()?;
//! let engine = SummaryEngine::new(backend, TierLadder::openai_default());
//! ```

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};
use tracing::debug;

use crate::error::{BackendError, BackendResult};
use crate::traits::backend::{Completion, CompletionRequest, SummaryBackend};

/// Chat-completions backend. The model comes from each request.
#[derive(Clone)]
pub struct OpenAIBackend {
    client: OpenAIClient,
}

impl OpenAIBackend {
    pub fn new(client: OpenAIClient) -> Self {
        Self { client }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> BackendResult<Self> {
        Ok(Self::new(OpenAIClient::from_env()?))
    }
}

#[async_trait]
impl SummaryBackend for OpenAIBackend {
    async fn complete(&self, request: CompletionRequest) -> BackendResult<Completion> {
        let chat = ChatRequest::new(&request.model)
            .message(Message::system(request.system))
            .message(Message::user(request.user))
            .output_budget(request.max_output_tokens);

        let response = self.client.chat_completion(chat).await.map_err(BackendError::from)?;
        let usage = response.usage.as_ref();

        debug!(
            model = %request.model,
            truncated = response.is_truncated(),
            prompt_tokens = usage.map(|u| u.prompt_tokens),
            completion_tokens = usage.map(|u| u.completion_tokens),
            "Completion received"
        );

        Ok(Completion {
            truncated: response.is_truncated(),
            text: response.content,
        })
    }
}
