//! Decision source trait.

use async_trait::async_trait;
use url::Url;

use crate::error::FetchResult;
use crate::types::FeedEntry;

/// Network access the pipeline needs: the feed, detail pages and documents.
#[async_trait]
pub trait DecisionSource: Send + Sync {
    /// Fetch and parse the decision feed, in feed order.
    async fn fetch_feed(&self, feed_url: &Url) -> FetchResult<Vec<FeedEntry>>;

    /// Fetch a detail page as HTML.
    async fn fetch_page(&self, url: &Url) -> FetchResult<String>;

    /// Fetch a binary document.
    async fn fetch_document(&self, url: &Url) -> FetchResult<Vec<u8>>;
}
