//! Document link location trait.

use url::Url;

/// Finds the document link on a decision's detail page.
///
/// Synchronous: HTML parsing happens between awaits, never across one.
pub trait LinkLocator: Send + Sync {
    /// Resolve the best document link on `page_html`, if any.
    ///
    /// Relative hrefs resolve against `page_url`.
    fn locate_document_link(&self, page_html: &str, page_url: &Url) -> Option<Url>;
}
