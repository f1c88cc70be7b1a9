//! End-to-end runs against the mock source, extractor and backend.

use std::num::NonZeroUsize;

use casebrief::error::SkipReason;
use casebrief::pipeline::cost::estimate_cost;
use casebrief::pipeline::prompts::REDUCE_PROMPT;
use casebrief::report::{build_story, Block};
use casebrief::testing::{MockBackend, MockReply, MockSource, MockSourceCall, StaticExtractor};
use casebrief::types::{CostAssumptions, NO_SUMMARY};
use casebrief::{
    ChunkSize, DigestError, FeedEntry, Pipeline, RunSummary, ScoredLinkLocator, Settings, SummaryState, TierLadder,
};
use chrono::{DateTime, FixedOffset};
use tempfile::TempDir;
use url::Url;

const DETAIL: &str = "https://www.bundesfinanzhof.de/de/entscheidung/detail/STRE202510171/";
const DOCUMENT: &str = "https://www.bundesfinanzhof.de/pdf/STRE202510171.pdf?type=1646225765";

fn now() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc2822("Fri, 05 Sep 2025 08:00:00 +0200").unwrap()
}

fn entry(title: &str, detail: &str) -> FeedEntry {
    FeedEntry {
        title: title.to_string(),
        published: DateTime::parse_from_rfc2822("Thu, 04 Sep 2025 10:00:02 +0200").unwrap(),
        detail_link: Url::parse(detail).unwrap(),
    }
}

fn detail_page() -> String {
    r#"<html><body>
        <h1>VI R 4/23</h1>
        <a href="/de/presse/">Presse</a>
        <a class="link-download" href="/pdf/STRE202510171.pdf?type=1646225765">PDF herunterladen</a>
    </body></html>"#
        .to_string()
}

fn settings(dir: &TempDir, chunk_chars: usize) -> Settings {
    Settings::new()
        .with_download_dir(dir.path().join("downloads"))
        .with_report_dir(dir.path().join("weekly_reports"))
        .with_chunk_size(ChunkSize::Chars(NonZeroUsize::new(chunk_chars).unwrap()))
}

fn source_with_document(transcript: &str) -> MockSource {
    MockSource::new()
        .with_entry(entry("VI R 4/23 – Steuerliche Behandlung von Kryptowährungen", DETAIL))
        .with_page(DETAIL, detail_page())
        .with_document(DOCUMENT, transcript.as_bytes().to_vec())
}

async fn run(
    source: MockSource,
    backend: MockBackend,
    settings: Settings,
) -> Result<RunSummary, DigestError> {
    let locator = ScoredLinkLocator::new(settings.fetch.document_href_pattern.clone());
    Pipeline::new(source, backend, StaticExtractor::new(), locator, settings)
        .unwrap()
        .run_at(now())
        .await
}

fn story_texts(summary: &RunSummary, settings: &Settings) -> Vec<String> {
    let meta = summary.report.as_ref().expect("report meta");
    build_story(&summary.records, meta, &settings.report)
        .into_iter()
        .filter_map(|block| match block {
            Block::Title(t) | Block::Heading1(t) | Block::Heading2(t) | Block::Heading3(t) => Some(t),
            Block::Paragraph { text, .. } => Some(text),
            _ => None,
        })
        .collect()
}

fn padded(prefix: &str, chars: usize) -> String {
    let mut text = prefix.to_string();
    while text.chars().count() < chars {
        text.push('x');
    }
    text
}

#[tokio::test]
async fn test_single_short_document_is_still_reduced() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000);
    let transcript = padded(
        "Leitsätze: Gewinne aus Kryptowährungen sind steuerbar. Tenor: Die Revision wird zurückgewiesen. ",
        500,
    );
    let backend = MockBackend::new()
        .reply("gpt-5-nano", MockReply::text("Teilzusammenfassung."))
        .reply("gpt-5-nano", MockReply::text("Der BFH behandelt Kryptowährungen als Wirtschaftsgüter."));

    let summary = run(source_with_document(&transcript), backend.clone(), settings.clone())
        .await
        .unwrap();

    // one chunk, then reduce
    assert_eq!(backend.call_count(), 2);
    let calls = backend.calls();
    assert_eq!(calls[0].user, transcript);
    assert_eq!(calls[1].system, REDUCE_PROMPT);
    assert_eq!(calls[1].user, "Teilzusammenfassung.");

    assert_eq!(summary.records.len(), 1);
    let record = &summary.records[0];
    assert_eq!(record.summary_state, SummaryState::Reduced);
    assert_eq!(record.summary, "Der BFH behandelt Kryptowährungen als Wirtschaftsgüter.");
    assert_eq!(record.headnote.as_deref(), Some("Gewinne aus Kryptowährungen sind steuerbar."));
    assert_eq!(record.document_link.as_ref().unwrap().as_str(), DOCUMENT);

    let meta = summary.report.as_ref().unwrap();
    let expected_cost = estimate_cost(1, "gpt-5-nano", &TierLadder::openai_default(), &CostAssumptions::default());
    assert_eq!(meta.highest_tier.as_deref(), Some("gpt-5-nano"));
    assert_eq!(meta.estimated_cost, expected_cost);

    let texts = story_texts(&summary, &settings);
    assert!(texts.iter().any(|t| t.contains("höchstes verwendetes Modell: gpt-5-nano")));
    assert!(texts.iter().any(|t| t.contains(&format!("ca. {expected_cost} USD"))));
    assert!(texts.contains(&"VI R 4/23 – Steuerliche Behandlung von Kryptowährungen".to_string()));

    let path = summary.report_path.unwrap();
    assert!(path.ends_with("weekly_reports/BFH_Entscheidungen_KW36_2025.pdf"));
    assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    // dated with the run, not the publication
    assert!(dir.path().join("downloads/VI_R_4_23_2025-09-05.pdf").exists());
}

#[tokio::test]
async fn test_missing_document_link_still_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000);
    let source = MockSource::new()
        .with_entry(entry("VI R 4/23 – Ohne PDF", DETAIL))
        .with_page(DETAIL, r#"<a href="/de/presse/">Presse</a>"#);
    let backend = MockBackend::new().always("gpt-5-nano", MockReply::text("nie"));

    let summary = run(source.clone(), backend.clone(), settings.clone()).await.unwrap();

    assert!(summary.records.is_empty());
    assert_eq!(summary.skipped.len(), 1);
    assert!(matches!(
        summary.skipped[0].reason,
        SkipReason::Fetch(casebrief::FetchError::NoDocumentLink { .. })
    ));
    assert_eq!(backend.call_count(), 0);
    assert!(!source
        .calls()
        .iter()
        .any(|c| matches!(c, MockSourceCall::Document { .. })));

    let texts = story_texts(&summary, &settings);
    assert!(texts.contains(&"Wochenbericht zu aktuellen Entscheidungen".to_string()));
    assert!(texts.contains(&"Zusammenfassungen der Entscheidungen".to_string()));
    assert!(texts.contains(&"Technische Hinweise".to_string()));
    assert!(!texts.iter().any(|t| t.starts_with("VI R 4/23")));

    assert!(summary.report_path.unwrap().exists());
}

#[tokio::test]
async fn test_failed_chunk_escalates_and_highest_tier_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 2_000);
    let transcript = padded("Gründe: ", 6_500);
    let backend = MockBackend::new()
        .reply("gpt-5-nano", MockReply::text("N1"))
        .reply("gpt-5-nano", MockReply::Error)
        .reply("gpt-5-nano", MockReply::text("N3"))
        .reply("gpt-5-nano", MockReply::text("N4"))
        .reply("gpt-5-nano", MockReply::text("Gesamtergebnis."))
        .reply("gpt-5-mini", MockReply::text("M2"));

    let summary = run(source_with_document(&transcript), backend.clone(), settings.clone())
        .await
        .unwrap();

    assert_eq!(
        backend.models_called(),
        vec!["gpt-5-nano", "gpt-5-nano", "gpt-5-mini", "gpt-5-nano", "gpt-5-nano", "gpt-5-nano"]
    );

    let calls = backend.calls();
    let chunk_sizes: Vec<usize> = [0, 1, 3, 4].iter().map(|&i| calls[i].user.chars().count()).collect();
    assert_eq!(chunk_sizes, vec![2_000, 2_000, 2_000, 500]);
    assert_eq!(calls[1].user, calls[2].user);
    assert_eq!(calls[5].user, "N1\n\n---\n\nM2\n\n---\n\nN3\n\n---\n\nN4");

    let record = &summary.records[0];
    assert_eq!(record.summary, "Gesamtergebnis.");
    assert_eq!(record.tier_used.as_ref().unwrap().name, "gpt-5-mini");
    assert_eq!(summary.highest_tier.as_ref().unwrap().name, "gpt-5-mini");

    let texts = story_texts(&summary, &settings);
    assert!(texts.iter().any(|t| t.contains("höchstes verwendetes Modell: gpt-5-mini")));
}

#[tokio::test]
async fn test_exhausted_reduce_joins_chunk_summaries() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 10);
    let backend = MockBackend::new()
        .reply("gpt-5-nano", MockReply::text("Erster Teil."))
        .reply("gpt-5-nano", MockReply::text("Zweiter Teil."));

    let summary = run(source_with_document("0123456789abcdefghij"), backend.clone(), settings)
        .await
        .unwrap();

    let record = &summary.records[0];
    assert_eq!(record.summary_state, SummaryState::ReducedDegraded);
    assert_eq!(record.summary, "Erster Teil.\nZweiter Teil.");
    // 2 chunks + reduce on all 3 tiers
    assert_eq!(backend.call_count(), 5);
}

#[tokio::test]
async fn test_total_failure_yields_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000);
    let backend = MockBackend::new()
        .always("gpt-5-nano", MockReply::Empty)
        .always("gpt-5-mini", MockReply::Unreachable)
        .always("gpt-5", MockReply::text("   "));

    let summary = run(source_with_document("Volltext der Entscheidung"), backend.clone(), settings)
        .await
        .unwrap();

    let record = &summary.records[0];
    assert_eq!(record.summary_state, SummaryState::Failed);
    assert_eq!(record.summary, NO_SUMMARY);
    assert!(record.tier_used.is_none());
    // reduce is skipped
    assert_eq!(backend.call_count(), 3);
    assert!(summary.report_path.unwrap().exists());
}

#[tokio::test]
async fn test_truncated_chunk_is_kept_and_counted() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000);
    let backend = MockBackend::new()
        .reply("gpt-5-nano", MockReply::truncated("Der Senat hat"))
        .reply("gpt-5-nano", MockReply::text("Kurzfassung."));

    let summary = run(source_with_document("Volltext"), backend.clone(), settings)
        .await
        .unwrap();

    assert_eq!(backend.models_called(), vec!["gpt-5-nano", "gpt-5-nano"]);
    assert_eq!(summary.records[0].truncated_outputs, 1);
    assert_eq!(summary.report.unwrap().truncated_outputs, 1);
}

#[tokio::test]
async fn test_default_tier_does_not_skip_cheaper_tiers() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000).with_default_tier("gpt-5");
    let backend = MockBackend::new().always("gpt-5-nano", MockReply::text("Ergebnis."));

    let summary = run(source_with_document("Volltext"), backend.clone(), settings)
        .await
        .unwrap();

    assert!(backend.models_called().iter().all(|m| m == "gpt-5-nano"));
    assert_eq!(summary.report.unwrap().cost_tier, "gpt-5-nano");
}

#[tokio::test]
async fn test_default_tier_prices_a_run_without_summaries() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000).with_default_tier("gpt-5");

    let summary = run(source_with_document("Volltext"), MockBackend::new(), settings)
        .await
        .unwrap();

    let report = summary.report.unwrap();
    assert_eq!(report.cost_tier, "gpt-5");
    assert!(report.highest_tier.is_none());
}

#[tokio::test]
async fn test_empty_feed_writes_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000);

    let summary = run(MockSource::new(), MockBackend::new(), settings).await.unwrap();

    assert_eq!(summary.feed_entries, 0);
    assert!(summary.report_path.is_none());
    assert!(summary.report.is_none());
    assert!(!dir.path().join("weekly_reports").exists());
}

#[tokio::test]
async fn test_feed_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000);

    let err = run(MockSource::new().with_feed_unavailable(), MockBackend::new(), settings)
        .await
        .unwrap_err();

    assert!(matches!(err, DigestError::Fetch(_)));
}

#[tokio::test]
async fn test_test_mode_processes_one_decision() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000).with_test_mode(true);
    let source = source_with_document("Volltext").with_entry(entry(
        "IX R 12/24 – Vermietung",
        "https://www.bundesfinanzhof.de/de/entscheidung/detail/STRE2/",
    ));
    let backend = MockBackend::new().always("gpt-5-nano", MockReply::text("ok"));

    let summary = run(source.clone(), backend, settings).await.unwrap();

    assert_eq!(summary.feed_entries, 2);
    assert_eq!(summary.records.len(), 1);
    let pages: Vec<_> = source
        .calls()
        .into_iter()
        .filter(|c| matches!(c, MockSourceCall::Page { .. }))
        .collect();
    assert_eq!(pages.len(), 1);
}

#[tokio::test]
async fn test_unreadable_document_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000);
    let source = MockSource::new()
        .with_entry(entry("VI R 4/23 – Defekt", DETAIL))
        .with_page(DETAIL, detail_page())
        .with_document(DOCUMENT, vec![0xff, 0xfe, 0x00]);

    let summary = run(source, MockBackend::new(), settings).await.unwrap();

    assert!(summary.records.is_empty());
    assert!(matches!(summary.skipped[0].reason, SkipReason::Extract(_)));
    assert!(summary.report_path.is_some());
}

#[tokio::test]
async fn test_document_is_named_after_run_date() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, 24_000);
    let backend = MockBackend::new().always("gpt-5-nano", MockReply::text("ok"));
    let locator = ScoredLinkLocator::new(settings.fetch.document_href_pattern.clone());
    let run_date = DateTime::parse_from_rfc2822("Wed, 10 Sep 2025 07:30:00 +0200").unwrap();

    Pipeline::new(source_with_document("Volltext"), backend, StaticExtractor::new(), locator, settings)
        .unwrap()
        .run_at(run_date)
        .await
        .unwrap();

    let files: Vec<String> = std::fs::read_dir(dir.path().join("downloads"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files, vec!["VI_R_4_23_2025-09-10.pdf"]);
}
