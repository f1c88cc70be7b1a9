//! Document link scoring on detail pages.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::traits::locator::LinkLocator;

/// Picks the most download-like link whose href contains a pattern.
///
/// Scoring per candidate:
/// - +3 class containing `download`, or a `download` attribute
/// - +2 visible text or `title` containing `PDF` (any case)
/// - +1 a `type` query parameter
///
/// The highest score wins; ties go to the earlier link. When no href
/// matches the pattern, links whose text is exactly `PDF` are considered
/// instead.
#[derive(Debug, Clone)]
pub struct ScoredLinkLocator {
    href_pattern: String,
}

impl Default for ScoredLinkLocator {
    fn default() -> Self {
        Self::new("/pdf/")
    }
}

impl ScoredLinkLocator {
    pub fn new(href_pattern: impl Into<String>) -> Self {
        Self {
            href_pattern: href_pattern.into(),
        }
    }

    fn score(link: &ElementRef<'_>, url: &Url) -> u32 {
        let element = link.value();
        let mut score = 0;

        let download_class = element
            .attr("class")
            .is_some_and(|c| c.to_ascii_lowercase().contains("download"));
        if download_class || element.attr("download").is_some() {
            score += 3;
        }

        let text = visible_text(link).to_ascii_lowercase();
        let title = element.attr("title").unwrap_or_default().to_ascii_lowercase();
        if text.contains("pdf") || title.contains("pdf") {
            score += 2;
        }

        if url.query_pairs().any(|(key, _)| key == "type") {
            score += 1;
        }

        score
    }
}

impl LinkLocator for ScoredLinkLocator {
    fn locate_document_link(&self, page_html: &str, page_url: &Url) -> Option<Url> {
        let document = Html::parse_document(page_html);
        let selector = Selector::parse("a[href]").ok()?;

        let links: Vec<(ElementRef<'_>, Url)> = document
            .select(&selector)
            .filter_map(|link| {
                let href = link.value().attr("href")?.trim();
                if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") || href.starts_with("mailto:") {
                    return None;
                }
                page_url.join(href).ok().map(|url| (link, url))
            })
            .collect();

        let mut candidates: Vec<&(ElementRef<'_>, Url)> = links
            .iter()
            .filter(|(_, url)| url.as_str().contains(&self.href_pattern))
            .collect();

        if candidates.is_empty() {
            candidates = links.iter().filter(|(link, _)| visible_text(link) == "PDF").collect();
        }

        let mut best: Option<(u32, &Url)> = None;
        for (link, url) in candidates {
            let score = Self::score(link, url);
            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, url));
            }
        }

        if let Some((score, url)) = best {
            debug!(url = %url, score, page = %page_url, "Document link located");
        }
        best.map(|(_, url)| url.clone())
    }
}

fn visible_text(link: &ElementRef<'_>) -> String {
    link.text().collect::<String>().trim().to_string()
}
