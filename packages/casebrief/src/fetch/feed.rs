//! RSS feed parsing.

use chrono::DateTime;
use rss::{Channel, Item};
use tracing::warn;
use url::Url;

use crate::error::FetchResult;
use crate::types::FeedEntry;

/// Parse an RSS 2.0 body into feed entries, in feed order.
///
/// Items without a title or link, or with an unreadable `pubDate`, are
/// skipped with a warning.
pub fn parse_feed(body: &[u8]) -> FetchResult<Vec<FeedEntry>> {
    let channel = Channel::read_from(body)?;
    Ok(channel.items().iter().filter_map(map_item).collect())
}

fn map_item(item: &Item) -> Option<FeedEntry> {
    let Some(title) = item.title().map(str::trim).filter(|t| !t.is_empty()) else {
        warn!(link = ?item.link(), "Feed item without title, skipping");
        return None;
    };

    let link = match item.link().map(|l| Url::parse(l.trim())) {
        Some(Ok(url)) => url,
        Some(Err(e)) => {
            warn!(title = %title, error = %e, "Feed item with invalid link, skipping");
            return None;
        }
        None => {
            warn!(title = %title, "Feed item without link, skipping");
            return None;
        }
    };

    let published = match item.pub_date().map(|d| DateTime::parse_from_rfc2822(d.trim())) {
        Some(Ok(date)) => date,
        Some(Err(e)) => {
            warn!(title = %title, error = %e, "Feed item with unreadable date, skipping");
            return None;
        }
        None => {
            warn!(title = %title, "Feed item without date, skipping");
            return None;
        }
    };

    Some(FeedEntry {
        title: title.to_string(),
        published,
        detail_link: link,
    })
}
