//! Document fetcher: feed, detail pages, document links and downloads.

pub mod download;
pub mod feed;
pub mod http;
pub mod locate;

pub use download::{content_hash, document_file_name, save_document};
pub use feed::parse_feed;
pub use http::HttpSource;
pub use locate::ScoredLinkLocator;
