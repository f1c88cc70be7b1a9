use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use casebrief::{ChunkSize, Settings};
use dotenvy::dotenv;

/// Runner configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub model: String,
    pub test_mode: bool,
    pub feed_url: String,
    pub document_href_pattern: String,
    pub chunk_chars: NonZeroUsize,
    pub http_timeout: Duration,
    pub download_dir: PathBuf,
    pub report_dir: PathBuf,
    pub report_font: Option<PathBuf>,
    pub organization: String,
    pub hyphenate: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Settings::default();

        Ok(Self {
            openai_api_key: var("OPENAI_API_KEY").filter(|k| !k.is_empty()),
            openai_base_url: var("OPENAI_BASE_URL"),
            model: var("MODEL").unwrap_or(defaults.default_tier),
            test_mode: match var("TEST_MODE") {
                Some(v) => parse_bool(&v).context("TEST_MODE must be true or false")?,
                None => defaults.test_mode,
            },
            feed_url: var("FEED_URL").unwrap_or(defaults.fetch.feed_url),
            document_href_pattern: var("DOCUMENT_HREF_PATTERN").unwrap_or(defaults.fetch.document_href_pattern),
            chunk_chars: match var("CHUNK_CHARS") {
                Some(v) => v.parse().context("CHUNK_CHARS must be a positive number")?,
                None => NonZeroUsize::new(defaults.chunk_size.max_chars()).context("default chunk size is zero")?,
            },
            http_timeout: match var("HTTP_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(v.parse().context("HTTP_TIMEOUT_SECS must be a valid number")?),
                None => defaults.fetch.http_timeout,
            },
            download_dir: var("DOWNLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.fetch.download_dir),
            report_dir: var("REPORT_DIR").map(PathBuf::from).unwrap_or(defaults.report.output_dir),
            report_font: var("REPORT_FONT")
                .map(PathBuf::from)
                .or(defaults.report.font_path),
            organization: var("ORGANIZATION").unwrap_or(defaults.report.organization),
            hyphenate: match var("HYPHENATE") {
                Some(v) => parse_bool(&v).context("HYPHENATE must be true or false")?,
                None => defaults.report.hyphenate,
            },
        })
    }

    /// Build the library settings.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::new()
            .with_default_tier(self.model.clone())
            .with_test_mode(self.test_mode)
            .with_feed_url(self.feed_url.clone())
            .with_chunk_size(ChunkSize::Chars(self.chunk_chars))
            .with_download_dir(self.download_dir.clone())
            .with_report_dir(self.report_dir.clone());

        settings.fetch.document_href_pattern = self.document_href_pattern.clone();
        settings.fetch.http_timeout = self.http_timeout;
        settings.report.font_path = self.report_font.clone();
        settings.report.organization = self.organization.clone();
        settings.report.hyphenate = self.hyphenate;
        settings
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.openai_api_key.as_deref().context("OPENAI_API_KEY must be set")
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("not a boolean: {other}"),
    }
}
