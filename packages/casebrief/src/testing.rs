//! Testing utilities including mock implementations.
//!
//! These let applications and tests drive the whole pipeline without
//! network access, real PDFs or LLM calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};
use url::Url;

use crate::error::{BackendError, BackendResult, ExtractError, ExtractResult, FetchError, FetchResult};
use crate::traits::{
    backend::{Completion, CompletionRequest, SummaryBackend},
    extractor::TextExtractor,
    source::DecisionSource,
};
use crate::types::FeedEntry;

/// A scripted backend answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Natural stop with this text
    Text(String),
    /// Output budget exhausted with this text
    Truncated(String),
    /// Successful call with no content
    Empty,
    /// Backend answered with an error status
    Error,
    /// Backend unreachable
    Unreachable,
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn truncated(text: impl Into<String>) -> Self {
        Self::Truncated(text.into())
    }

    fn into_result(self, model: &str) -> BackendResult<Completion> {
        match self {
            Self::Text(text) => Ok(Completion::stop(text)),
            Self::Truncated(text) => Ok(Completion::truncated(text)),
            Self::Empty => Ok(Completion::stop("")),
            Self::Error => Err(BackendError::Api {
                status: 500,
                message: format!("mock error for {model}"),
            }),
            Self::Unreachable => Err(BackendError::Network(format!("mock: {model} unreachable"))),
        }
    }
}

#[derive(Default)]
struct MockBackendState {
    /// One-shot replies per model, consumed in order
    queued: HashMap<String, VecDeque<MockReply>>,

    /// Reply used once a model's queue is empty
    sticky: HashMap<String, MockReply>,

    /// Call tracking for assertions
    calls: Vec<CompletionRequest>,
}

/// A mock summarization backend with per-model scripts.
///
/// A model with nothing scripted fails with [`BackendError::UnknownModel`].
/// Clones share state, so a test can keep a handle after moving one into
/// the pipeline.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<RwLock<MockBackendState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a one-shot reply for `model`.
    pub fn reply(self, model: impl Into<String>, reply: MockReply) -> Self {
        self.state
            .write()
            .unwrap()
            .queued
            .entry(model.into())
            .or_default()
            .push_back(reply);
        self
    }

    /// Answer every otherwise unscripted call to `model` with `reply`.
    pub fn always(self, model: impl Into<String>, reply: MockReply) -> Self {
        self.state.write().unwrap().sticky.insert(model.into(), reply);
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.state.read().unwrap().calls.clone()
    }

    /// Models of all recorded calls, in order.
    pub fn models_called(&self) -> Vec<String> {
        self.state.read().unwrap().calls.iter().map(|c| c.model.clone()).collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.read().unwrap().calls.len()
    }
}

#[async_trait]
impl SummaryBackend for MockBackend {
    async fn complete(&self, request: CompletionRequest) -> BackendResult<Completion> {
        let reply = {
            let mut state = self.state.write().unwrap();
            state.calls.push(request.clone());
            let queued = state.queued.get_mut(&request.model).and_then(VecDeque::pop_front);
            queued.or_else(|| state.sticky.get(&request.model).cloned())
        };

        match reply {
            Some(reply) => reply.into_result(&request.model),
            None => Err(BackendError::UnknownModel(request.model)),
        }
    }
}

/// Record of a call made to the mock source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockSourceCall {
    Feed { url: String },
    Page { url: String },
    Document { url: String },
}

/// A mock decision source serving canned feed entries, pages and documents.
///
/// Unknown pages and documents answer with HTTP 404.
#[derive(Clone, Default)]
pub struct MockSource {
    entries: Arc<RwLock<Vec<FeedEntry>>>,
    feed_unavailable: Arc<RwLock<bool>>,
    pages: Arc<RwLock<HashMap<String, String>>>,
    documents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    calls: Arc<RwLock<Vec<MockSourceCall>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a feed entry.
    pub fn with_entry(self, entry: FeedEntry) -> Self {
        self.entries.write().unwrap().push(entry);
        self
    }

    /// Make the feed itself fail.
    pub fn with_feed_unavailable(self) -> Self {
        *self.feed_unavailable.write().unwrap() = true;
        self
    }

    /// Serve `html` for a detail page.
    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.write().unwrap().insert(url.into(), html.into());
        self
    }

    /// Serve `bytes` for a document.
    pub fn with_document(self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.documents.write().unwrap().insert(url.into(), bytes.into());
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<MockSourceCall> {
        self.calls.read().unwrap().clone()
    }

    fn record(&self, call: MockSourceCall) {
        self.calls.write().unwrap().push(call);
    }
}

#[async_trait]
impl DecisionSource for MockSource {
    async fn fetch_feed(&self, feed_url: &Url) -> FetchResult<Vec<FeedEntry>> {
        self.record(MockSourceCall::Feed {
            url: feed_url.to_string(),
        });
        if *self.feed_unavailable.read().unwrap() {
            return Err(FetchError::Status {
                url: feed_url.to_string(),
                status: 503,
            });
        }
        Ok(self.entries.read().unwrap().clone())
    }

    async fn fetch_page(&self, url: &Url) -> FetchResult<String> {
        self.record(MockSourceCall::Page { url: url.to_string() });
        self.pages
            .read()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    async fn fetch_document(&self, url: &Url) -> FetchResult<Vec<u8>> {
        self.record(MockSourceCall::Document { url: url.to_string() });
        self.documents
            .read()
            .unwrap()
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// A text extractor that reads documents as UTF-8.
///
/// Specific documents can be mapped to a fixed transcript. Invalid UTF-8
/// fails like a broken PDF; blank text fails as [`ExtractError::Empty`].
#[derive(Clone, Default)]
pub struct StaticExtractor {
    texts: Arc<RwLock<HashMap<Vec<u8>, String>>>,
}

impl StaticExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `text` for a document with exactly these bytes.
    pub fn with_text(self, document: impl Into<Vec<u8>>, text: impl Into<String>) -> Self {
        self.texts.write().unwrap().insert(document.into(), text.into());
        self
    }
}

impl TextExtractor for StaticExtractor {
    fn extract_text(&self, document: &[u8]) -> ExtractResult<String> {
        let text = match self.texts.read().unwrap().get(document) {
            Some(text) => text.clone(),
            None => String::from_utf8(document.to_vec()).map_err(|e| ExtractError::Pdf(e.to_string()))?,
        };
        if text.trim().is_empty() {
            return Err(ExtractError::Empty);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_backend_queue_then_sticky() {
        let backend = MockBackend::new()
            .reply("m", MockReply::Empty)
            .always("m", MockReply::text("immer"));

        let first = backend.complete(CompletionRequest::new("m", "s", "u")).await.unwrap();
        let second = backend.complete(CompletionRequest::new("m", "s", "u")).await.unwrap();

        assert_eq!(first.text, "");
        assert_eq!(second.text, "immer");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_backend_unscripted_model() {
        let err = MockBackend::new()
            .complete(CompletionRequest::new("gpt-5", "s", "u"))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::UnknownModel(m) if m == "gpt-5"));
    }

    #[tokio::test]
    async fn test_mock_source_missing_page_is_404() {
        let source = MockSource::new();
        let url = Url::parse("https://example.org/x").unwrap();

        let err = source.fetch_page(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(source.calls(), vec![MockSourceCall::Page { url: url.to_string() }]);
    }

    #[test]
    fn test_static_extractor() {
        let extractor = StaticExtractor::new().with_text(b"%PDF-1".to_vec(), "Volltext");

        assert_eq!(extractor.extract_text(b"%PDF-1").unwrap(), "Volltext");
        assert_eq!(extractor.extract_text(b"direkt").unwrap(), "direkt");
        assert!(matches!(extractor.extract_text(b"  "), Err(ExtractError::Empty)));
        assert!(matches!(extractor.extract_text(&[0xff, 0xfe]), Err(ExtractError::Pdf(_))));
    }
}
