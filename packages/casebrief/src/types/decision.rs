//! Decision records as they flow from the feed to the report.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use super::summary::{DecisionSummary, SummaryState};
use super::tier::TierRef;

/// Case number used when a title carries none.
pub const UNKNOWN_CASE_NUMBER: &str = "Unbekannt";

/// Case numbers like `VI R 4/23`, `IX B 112/24` or `XR 7/22`.
static CASE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{1,3}\s?[A-Z]?\s?\d+/\d{2}").unwrap());

/// Pull the case number out of a decision title.
pub fn extract_case_number(title: &str) -> String {
    CASE_NUMBER
        .find(title)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_CASE_NUMBER.to_string())
}

/// The title with the case number and the separator after it removed.
pub fn clean_title(title: &str, case_number: &str) -> String {
    if case_number == UNKNOWN_CASE_NUMBER {
        return title.trim().to_string();
    }
    title
        .replacen(case_number, "", 1)
        .trim()
        .trim_start_matches(|c: char| matches!(c, '-' | '–' | ':' | ',') || c.is_whitespace())
        .trim()
        .to_string()
}

/// One item of the decision feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: String,

    /// Publication timestamp in the feed's own offset
    pub published: DateTime<FixedOffset>,

    /// Detail page of the decision
    pub detail_link: Url,
}

/// A decision with everything the report needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub title: String,

    /// Derived from the title; [`UNKNOWN_CASE_NUMBER`] when absent
    pub case_number: String,

    pub published: DateTime<FixedOffset>,

    pub detail_link: Url,

    /// Resolved link to the decision document
    pub document_link: Option<Url>,

    /// Extracted transcript
    #[serde(skip)]
    pub raw_text: Option<String>,

    /// Official headnote ("Leitsätze"), verbatim
    pub headnote: Option<String>,

    /// Final summary, never empty
    pub summary: String,

    /// Most expensive tier that contributed to the summary
    pub tier_used: Option<TierRef>,

    pub summary_state: SummaryState,

    /// Number of accepted outputs that hit the output budget
    pub truncated_outputs: usize,
}

impl DecisionRecord {
    /// Start a record from a feed entry.
    pub fn from_entry(entry: FeedEntry) -> Self {
        let case_number = extract_case_number(&entry.title);
        Self {
            title: entry.title,
            case_number,
            published: entry.published,
            detail_link: entry.detail_link,
            document_link: None,
            raw_text: None,
            headnote: None,
            summary: super::summary::NO_DOCUMENT.to_string(),
            tier_used: None,
            summary_state: SummaryState::Pending,
            truncated_outputs: 0,
        }
    }

    /// Set the document link.
    pub fn with_document_link(mut self, link: Url) -> Self {
        self.document_link = Some(link);
        self
    }

    /// Set the transcript and headnote.
    pub fn with_text(mut self, raw_text: String, headnote: Option<String>) -> Self {
        self.raw_text = Some(raw_text);
        self.headnote = headnote;
        self
    }

    /// Apply the engine's outcome.
    pub fn with_summary(mut self, summary: DecisionSummary) -> Self {
        self.summary = summary.text;
        self.tier_used = summary.highest_tier;
        self.summary_state = summary.state;
        self.truncated_outputs = summary.truncated_outputs;
        self
    }

    /// Title without the leading case number.
    pub fn clean_title(&self) -> String {
        clean_title(&self.title, &self.case_number)
    }

    /// Report heading: `case number – clean title`.
    pub fn heading(&self) -> String {
        format!("{} – {}", self.case_number, self.clean_title())
    }
}
