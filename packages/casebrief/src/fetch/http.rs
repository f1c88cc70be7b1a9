//! HTTP-backed decision source.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use super::feed::parse_feed;
use crate::error::{FetchError, FetchResult};
use crate::traits::source::DecisionSource;
use crate::types::{FeedEntry, FetchSettings};

/// Fetches the feed, detail pages and documents over HTTP.
///
/// Every request shares one client with a fixed timeout. No retries.
#[derive(Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Create a source with the given timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client })
    }

    pub fn from_settings(settings: &FetchSettings) -> FetchResult<Self> {
        Self::new(settings.http_timeout, &settings.user_agent)
    }

    async fn get(&self, url: &Url) -> FetchResult<reqwest::Response> {
        debug!(url = %url, "HTTP fetch starting");
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            FetchError::Http {
                url: url.to_string(),
                source: e,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "HTTP error status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_bytes(&self, url: &Url) -> FetchResult<Vec<u8>> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(|e| FetchError::Http {
            url: url.to_string(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl DecisionSource for HttpSource {
    async fn fetch_feed(&self, feed_url: &Url) -> FetchResult<Vec<FeedEntry>> {
        let body = self.get_bytes(feed_url).await?;
        let entries = parse_feed(&body)?;
        debug!(url = %feed_url, entries = entries.len(), "Feed parsed");
        Ok(entries)
    }

    async fn fetch_page(&self, url: &Url) -> FetchResult<String> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| FetchError::Http {
            url: url.to_string(),
            source: e,
        })
    }

    async fn fetch_document(&self, url: &Url) -> FetchResult<Vec<u8>> {
        let bytes = self.get_bytes(url).await?;
        debug!(url = %url, bytes = bytes.len(), "Document downloaded");
        Ok(bytes)
    }
}
