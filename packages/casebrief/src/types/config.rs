//! Run configuration.
//!
//! One [`Settings`] value is built at startup and passed down by reference.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::tier::TierLadder;
use crate::error::ConfigError;
use crate::pipeline::chunk::ChunkSize;
use crate::pipeline::prompts::Prompts;

/// Default decision feed.
pub const DEFAULT_FEED_URL: &str = "https://www.bundesfinanzhof.de/de/precedent.rss";

/// Token usage assumed per decision when estimating cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostAssumptions {
    /// Default: 30 000
    pub input_tokens: u64,

    /// Default: 500
    pub output_tokens: u64,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        Self {
            input_tokens: 30_000,
            output_tokens: 500,
        }
    }
}

/// Where decisions come from and how they are downloaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSettings {
    /// RSS feed listing recent decisions
    pub feed_url: String,

    /// Substring a document href must contain.
    ///
    /// Default: `/pdf/`.
    pub document_href_pattern: String,

    /// Per-request timeout for every network call.
    ///
    /// Default: 60 seconds.
    pub http_timeout: Duration,

    /// Directory downloaded documents are written to
    pub download_dir: PathBuf,

    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            document_href_pattern: "/pdf/".to_string(),
            http_timeout: Duration::from_secs(60),
            download_dir: PathBuf::from("downloads"),
            user_agent: format!("casebrief/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Report output and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Directory the report is written to
    pub output_dir: PathBuf,

    /// File name prefix, followed by `_KW<week>_<year>.pdf`
    pub file_prefix: String,

    /// Organization shown on the title page
    pub organization: String,

    /// Report title shown on the title page
    pub title: String,

    /// TrueType font; the built-in Helvetica is used when missing
    pub font_path: Option<PathBuf>,

    /// Insert German hyphenation points into long words
    pub hyphenate: bool,

    /// Closing line of the technical notes
    pub source_note: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("weekly_reports"),
            file_prefix: "BFH_Entscheidungen".to_string(),
            organization: "Bundesfinanzhof".to_string(),
            title: "Wochenbericht zu aktuellen Entscheidungen".to_string(),
            font_path: Some(PathBuf::from("fonts/DejaVuSans.ttf")),
            hyphenate: true,
            source_note: "Quelle: RSS-Feed des Bundesfinanzhofs.".to_string(),
        }
    }
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Full tier ladder, cheapest first
    pub tiers: TierLadder,

    /// Tier the cost estimate falls back to when no tier produced a
    /// summary. Every run still walks the full ladder.
    ///
    /// Default: `gpt-5-nano`.
    pub default_tier: String,

    /// Maximum chunk length
    pub chunk_size: ChunkSize,

    pub prompts: Prompts,

    pub cost: CostAssumptions,

    pub fetch: FetchSettings,

    pub report: ReportSettings,

    /// Process only the first feed entry
    pub test_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tiers: TierLadder::openai_default(),
            default_tier: "gpt-5-nano".to_string(),
            chunk_size: ChunkSize::default(),
            prompts: Prompts::default(),
            cost: CostAssumptions::default(),
            fetch: FetchSettings::default(),
            report: ReportSettings::default(),
            test_mode: false,
        }
    }
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tier ladder.
    pub fn with_tiers(mut self, tiers: TierLadder) -> Self {
        self.tiers = tiers;
        self
    }

    /// Set the cost fallback tier.
    pub fn with_default_tier(mut self, name: impl Into<String>) -> Self {
        self.default_tier = name.into();
        self
    }

    /// Set the chunk size.
    pub fn with_chunk_size(mut self, size: ChunkSize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Set the feed URL.
    pub fn with_feed_url(mut self, url: impl Into<String>) -> Self {
        self.fetch.feed_url = url.into();
        self
    }

    /// Set the download directory.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fetch.download_dir = dir.into();
        self
    }

    /// Set the report directory.
    pub fn with_report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report.output_dir = dir.into();
        self
    }

    /// Enable or disable test mode.
    pub fn with_test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    /// Parsed feed URL.
    pub fn feed_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.fetch.feed_url).map_err(|e| ConfigError::Invalid {
            field: "feed_url",
            reason: e.to_string(),
        })
    }

    /// Check that the settings are consistent.
    ///
    /// The default tier must be on the ladder, and every tier must fit a full
    /// chunk plus the longer instruction plus its own output budget into its
    /// context window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.position(&self.default_tier).is_none() {
            return Err(ConfigError::UnknownTier(self.default_tier.clone()));
        }
        self.feed_url()?;

        if self.fetch.document_href_pattern.is_empty() {
            return Err(ConfigError::Invalid {
                field: "document_href_pattern",
                reason: "must not be empty".into(),
            });
        }
        if self.fetch.http_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "http_timeout",
                reason: "must be greater than zero".into(),
            });
        }

        let chunk_tokens = self.chunk_size.approx_tokens();
        let instruction_tokens = self.prompts.instruction_tokens();

        for tier in self.tiers.tiers() {
            let reserved_tokens = instruction_tokens + tier.max_output_tokens as usize;
            if chunk_tokens + reserved_tokens > tier.context_window as usize {
                return Err(ConfigError::ChunkTooLarge {
                    tier: tier.name.clone(),
                    chunk_tokens,
                    reserved_tokens,
                    context_window: tier.context_window,
                });
            }
        }

        Ok(())
    }
}
