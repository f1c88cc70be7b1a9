//! Weekly decision digest runner.

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use casebrief::ai::OpenAIBackend;
use casebrief::pipeline::{estimate_all, estimate_cost};
use casebrief::report::render_report;
use casebrief::{
    DecisionRecord, FeedEntry, HttpSource, PdfTextExtractor, Pipeline, ReportMeta, RunSummary, ScoredLinkLocator,
    TierRef,
};
use chrono::Local;
use clap::{Parser, Subcommand};
use colored::Colorize;
use openai_client::OpenAIClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "casebrief", version, about = "Weekly court decision digests")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, summarize and write this week's report
    Run {
        /// Process only the first decision
        #[arg(long)]
        test_mode: bool,

        /// Tier used for the cost estimate when nothing was summarized
        #[arg(long)]
        model: Option<String>,
    },

    /// Render a report from built-in sample data, without network access
    SampleReport {
        #[arg(long, default_value = "weekly_reports/sample_report.pdf")]
        out: PathBuf,
    },

    /// Print the estimated weekly cost per tier
    Estimate {
        #[arg(long, default_value_t = 10)]
        decisions: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,casebrief=debug,openai_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let config = Config::from_env()?;
    match cli.command.unwrap_or(Command::Run {
        test_mode: false,
        model: None,
    }) {
        Command::Run { test_mode, model } => run(config, test_mode, model).await,
        Command::SampleReport { out } => sample_report(&config, &out).await,
        Command::Estimate { decisions } => {
            estimate(&config, decisions);
            Ok(())
        }
    }
}

async fn run(mut config: Config, test_mode: bool, model: Option<String>) -> Result<()> {
    config.test_mode |= test_mode;
    if let Some(model) = model {
        config.model = model;
    }
    let settings = config.settings();

    let mut client = OpenAIClient::new(config.require_api_key()?)
        .with_timeout(settings.fetch.http_timeout)
        .context("Failed to build OpenAI client")?;
    if let Some(base_url) = &config.openai_base_url {
        client = client.with_base_url(base_url.clone());
    }

    let source = HttpSource::from_settings(&settings.fetch).context("Failed to build HTTP client")?;
    let locator = ScoredLinkLocator::new(settings.fetch.document_href_pattern.clone());

    tracing::info!(
        feed = %settings.fetch.feed_url,
        model = %settings.default_tier,
        test_mode = settings.test_mode,
        "Starting weekly run"
    );

    let pipeline = Pipeline::new(
        source,
        OpenAIBackend::new(client),
        PdfTextExtractor::new(),
        locator,
        settings,
    )
    .context("Invalid settings")?;

    let summary = pipeline.run().await.context("Weekly run failed")?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("{}", "Weekly run finished".bright_green().bold());
    println!("  Feed entries:  {}", summary.feed_entries);
    println!("  Summarized:    {}", summary.records.len().to_string().green());

    if summary.skipped.is_empty() {
        println!("  Skipped:       0");
    } else {
        println!("  Skipped:       {}", summary.skipped.len().to_string().yellow());
        for skipped in &summary.skipped {
            println!("    {} {}: {}", "-".yellow(), skipped.title, skipped.reason);
        }
    }

    if let Some(tier) = &summary.highest_tier {
        println!("  Highest tier:  {}", tier.name.cyan());
    }
    if let Some(meta) = &summary.report {
        println!("  Est. cost:     ca. {} USD ({})", meta.estimated_cost, meta.cost_tier);
        if meta.truncated_outputs > 0 {
            println!("  Truncated:     {}", meta.truncated_outputs.to_string().yellow());
        }
    }

    match &summary.report_path {
        Some(path) => println!("  Report:        {}", path.display().to_string().bright_blue()),
        None => println!("  {}", "No decisions in feed, no report written".yellow()),
    }
}

fn estimate(config: &Config, decisions: usize) {
    let settings = config.settings();

    println!("{}", format!("Estimated cost for {decisions} decisions").bold());
    for (tier, cost) in estimate_all(decisions, &settings.tiers, &settings.cost) {
        let line = format!("  {tier:<12} ca. {cost} USD");
        if tier == settings.default_tier {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}

async fn sample_report(config: &Config, out: &Path) -> Result<()> {
    let settings = config.settings();
    let records = sample_records()?;
    let meta = ReportMeta {
        generated_at: Local::now().fixed_offset(),
        highest_tier: Some("gpt-5-mini".to_string()),
        cost_tier: "gpt-5-mini".to_string(),
        estimated_cost: estimate_cost(records.len(), "gpt-5-mini", &settings.tiers, &settings.cost),
        truncated_outputs: 0,
        prompt_fingerprint: settings.prompts.short_fingerprint(),
    };

    let bytes = render_report(&records, &meta, &settings.report).context("Failed to render sample report")?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!("{} {}", "Sample report written:".bright_green(), out.display());
    Ok(())
}

fn sample_records() -> Result<Vec<DecisionRecord>> {
    let samples = [
        (
            "VI R 4/23 – Steuerliche Behandlung von Gewinnen aus Kryptowährungsgeschäften",
            "https://www.bundesfinanzhof.de/de/entscheidung/entscheidungen-online/detail/STRE202510171/",
            Some("Gewinne aus der Veräußerung von Kryptowährungen innerhalb eines Jahres nach der Anschaffung sind als Einkünfte aus privaten Veräußerungsgeschäften steuerbar."),
            "Der Bundesfinanzhof bestätigt, dass virtuelle Währungen Wirtschaftsgüter im Sinne des Einkommensteuergesetzes sind. Veräußerungsgewinne innerhalb der einjährigen Spekulationsfrist unterliegen daher der Einkommensteuer. Ein strukturelles Vollzugsdefizit verneint der Senat.",
            TierRef { rank: 0, name: "gpt-5-nano".to_string() },
        ),
        (
            "IX R 12/24 – Umsatzsteuerbefreiung für Grundstücksvermietung",
            "https://www.bundesfinanzhof.de/de/entscheidung/entscheidungen-online/detail/STRE202510172/",
            None,
            "Die kurzfristige Überlassung möblierter Wohnungen an Monteure ist nicht nach der Grundstücksvermietungsbefreiung umsatzsteuerfrei, wenn sie einer hotelähnlichen Beherbergung entspricht. Maßgeblich ist eine Gesamtwürdigung der Leistungen.",
            TierRef { rank: 1, name: "gpt-5-mini".to_string() },
        ),
    ];

    samples
        .into_iter()
        .map(|(title, link, headnote, summary, tier)| -> Result<DecisionRecord> {
            let mut record = DecisionRecord::from_entry(FeedEntry {
                title: title.to_string(),
                published: Local::now().fixed_offset(),
                detail_link: Url::parse(link)?,
            });
            record.headnote = headnote.map(String::from);
            record.summary = summary.to_string();
            record.tier_used = Some(tier);
            Ok(record)
        })
        .collect()
}
