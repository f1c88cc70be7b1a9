//! Typed errors for the digest library.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Most of these never
//! leave the pipeline: backend errors fall through to the next tier and
//! fetch/extract errors skip a single decision. Only configuration, feed
//! and report errors reach the caller.

use thiserror::Error;

/// Top-level error for a digest run.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Settings are inconsistent
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The feed itself could not be fetched or parsed
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The report could not be written
    #[error("report failed: {0}")]
    Report(#[from] ReportError),
}

/// A single summarization call failed.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend unreachable (connection refused, timeout)
    #[error("backend unreachable: {0}")]
    Network(String),

    /// Backend answered with an error
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response could not be understood
    #[error("unparseable response: {0}")]
    Parse(String),

    /// Call succeeded but produced no text
    #[error("backend returned empty content")]
    EmptyContent,

    /// Backend is not configured for this model
    #[error("no backend for model: {0}")]
    UnknownModel(String),
}

#[cfg(feature = "openai")]
impl From<openai_client::OpenAIError> for BackendError {
    fn from(err: openai_client::OpenAIError) -> Self {
        use openai_client::OpenAIError;
        match err {
            OpenAIError::Network(msg) => Self::Network(msg),
            OpenAIError::Api { status, message } => Self::Api { status, message },
            OpenAIError::Parse(msg) => Self::Parse(msg),
            OpenAIError::Config(msg) => Self::Network(msg),
        }
    }
}

/// Errors while fetching the feed, a detail page or a document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// HTTP request failed
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Feed body is not a readable RSS channel
    #[error("feed parse error: {0}")]
    Feed(#[from] rss::Error),

    /// Nothing matched on the detail page
    #[error("no document link on {url}")]
    NoDocumentLink { url: String },

    /// Writing the downloaded document failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors while turning a document into text.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The PDF parser gave up
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// The document has no extractable text
    #[error("document contains no text")]
    Empty,
}

/// Why a single decision was left out of the report.
#[derive(Debug, Error)]
pub enum SkipReason {
    /// Detail page, link or document unavailable
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Document unreadable
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Errors while building or writing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// PDF writer error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Font could not be loaded
    #[error("font error: {0}")]
    Font(String),

    /// Hyphenation dictionary could not be loaded
    #[error("hyphenation dictionary error: {0}")]
    Dictionary(String),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Named tier is not in the ladder
    #[error("unknown tier: {0}")]
    UnknownTier(String),

    /// Tier ladder has no entries
    #[error("tier ladder is empty")]
    EmptyTiers,

    /// A chunk plus instruction plus output would overflow a tier's context
    #[error(
        "chunk of ~{chunk_tokens} tokens plus {reserved_tokens} reserved tokens exceeds \
         the {context_window}-token context of {tier}"
    )]
    ChunkTooLarge {
        tier: String,
        chunk_tokens: usize,
        reserved_tokens: usize,
        context_window: u32,
    },

    /// Malformed value
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type alias for a digest run.
pub type Result<T> = std::result::Result<T, DigestError>;

/// Result type alias for backend calls.
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for extraction.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type alias for report writing.
pub type ReportResult<T> = std::result::Result<T, ReportError>;
