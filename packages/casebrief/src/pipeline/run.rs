//! The weekly run: feed → documents → summaries → report.
//!
//! Strictly sequential. A decision that cannot be fetched or read is
//! skipped; summarization never fails a decision. Only the feed, the
//! settings and the final report write can fail a run.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local};
use tracing::{info, warn};

use crate::error::{ConfigError, FetchError, Result, SkipReason};
use crate::extract::extract_headnote;
use crate::fetch::save_document;
use crate::pipeline::cost::estimate_cost;
use crate::pipeline::engine::SummaryEngine;
use crate::report::{write_report, ReportMeta};
use crate::traits::{
    backend::SummaryBackend, extractor::TextExtractor, locator::LinkLocator, source::DecisionSource,
};
use crate::types::{DecisionRecord, FeedEntry, Settings, TierRef};

/// A decision left out of the report.
#[derive(Debug)]
pub struct SkippedDecision {
    pub title: String,
    pub reason: SkipReason,
}

/// Outcome of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Entries in the feed (before test mode)
    pub feed_entries: usize,

    /// Decisions that made it into the report
    pub records: Vec<DecisionRecord>,

    pub skipped: Vec<SkippedDecision>,

    /// Most expensive tier used across all decisions
    pub highest_tier: Option<TierRef>,

    /// Facts printed in the report; `None` when the feed was empty
    pub report: Option<ReportMeta>,

    /// `None` when the feed was empty
    pub report_path: Option<PathBuf>,
}

/// Drives one weekly run over its collaborators.
pub struct Pipeline<S, B, E, L> {
    source: S,
    engine: SummaryEngine<B>,
    extractor: E,
    locator: L,
    settings: Settings,
}

impl<S, B, E, L> Pipeline<S, B, E, L>
where
    S: DecisionSource,
    B: SummaryBackend,
    E: TextExtractor,
    L: LinkLocator,
{
    /// Validate `settings` and assemble the pipeline.
    pub fn new(
        source: S,
        backend: B,
        extractor: E,
        locator: L,
        settings: Settings,
    ) -> std::result::Result<Self, ConfigError> {
        let engine = SummaryEngine::from_settings(backend, &settings)?;
        Ok(Self {
            source,
            engine,
            extractor,
            locator,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run with the local clock.
    pub async fn run(&self) -> Result<RunSummary> {
        self.run_at(Local::now().fixed_offset()).await
    }

    /// Run as if it were `now`; `now` picks the report's calendar week.
    pub async fn run_at(&self, now: DateTime<FixedOffset>) -> Result<RunSummary> {
        let feed_url = self.settings.feed_url()?;
        let mut entries = self.source.fetch_feed(&feed_url).await?;
        let feed_entries = entries.len();
        info!(url = %feed_url, entries = feed_entries, "Feed fetched");

        if entries.is_empty() {
            info!("Feed has no decisions, no report written");
            return Ok(RunSummary::default());
        }

        if self.settings.test_mode {
            info!("Test mode: processing only the first decision");
            entries.truncate(1);
        }

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for entry in entries {
            let title = entry.title.clone();
            match self.process(entry, &now).await {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!(title = %title, reason = %reason, "Decision skipped");
                    skipped.push(SkippedDecision { title, reason });
                }
            }
        }

        let highest_tier = records.iter().filter_map(|r| r.tier_used.clone()).max();
        let cost_tier = highest_tier
            .as_ref()
            .map(|t| t.name.clone())
            .unwrap_or_else(|| self.settings.default_tier.clone());
        let estimated_cost = estimate_cost(
            records.len(),
            &cost_tier,
            &self.settings.tiers,
            &self.settings.cost,
        );
        let truncated_outputs = records.iter().map(|r| r.truncated_outputs).sum();

        let meta = ReportMeta {
            generated_at: now,
            highest_tier: highest_tier.as_ref().map(|t| t.name.clone()),
            cost_tier,
            estimated_cost,
            truncated_outputs,
            prompt_fingerprint: self.engine.prompts().short_fingerprint(),
        };
        let report_path = write_report(&records, &meta, &self.settings.report).await?;

        info!(
            processed = records.len(),
            skipped = skipped.len(),
            cost_usd = estimated_cost,
            "Run finished"
        );

        Ok(RunSummary {
            feed_entries,
            records,
            skipped,
            highest_tier,
            report: Some(meta),
            report_path: Some(report_path),
        })
    }

    /// Fetch, read and summarize one decision. The saved document is
    /// dated `now`.
    async fn process(
        &self,
        entry: FeedEntry,
        now: &DateTime<FixedOffset>,
    ) -> std::result::Result<DecisionRecord, SkipReason> {
        let record = DecisionRecord::from_entry(entry);
        info!(case = %record.case_number, url = %record.detail_link, "Processing decision");

        let page = self.source.fetch_page(&record.detail_link).await?;
        let link = self
            .locator
            .locate_document_link(&page, &record.detail_link)
            .ok_or_else(|| FetchError::NoDocumentLink {
                url: record.detail_link.to_string(),
            })?;

        let document = self.source.fetch_document(&link).await?;
        save_document(
            &self.settings.fetch.download_dir,
            &record.case_number,
            now,
            &document,
        )
        .await?;

        let text = self.extractor.extract_text(&document)?;
        let headnote = extract_headnote(&text);
        let summary = self.engine.summarize(&text).await;

        let record = record
            .with_document_link(link)
            .with_text(text, headnote)
            .with_summary(summary);

        info!(
            case = %record.case_number,
            state = ?record.summary_state,
            tier = record.tier_used.as_ref().map(|t| t.name.as_str()).unwrap_or("-"),
            "Decision summarized"
        );

        Ok(record)
    }
}
