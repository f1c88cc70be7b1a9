//! The report as a flat story of blocks.
//!
//! Building the story is pure; layout and PDF output happen later.

use chrono::{DateTime, FixedOffset};

use super::format::{format_cost, format_date, format_published, iso_week};
use crate::types::{DecisionRecord, ReportSettings};

/// One element of the report story.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Vertical space in millimetres
    Spacer(f32),
    /// Large centered line
    Title(String),
    Heading1(String),
    Heading2(String),
    Heading3(String),
    /// Body text; `hyphenate` marks prose that may be hyphenated
    Paragraph { text: String, hyphenate: bool },
    /// Label / value rows
    KeyValueTable(Vec<(String, String)>),
    PageBreak,
}

impl Block {
    fn text(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            hyphenate: false,
        }
    }

    fn prose(text: impl Into<String>) -> Self {
        Self::Paragraph {
            text: text.into(),
            hyphenate: true,
        }
    }
}

/// Run-level facts shown on the title page and in the technical notes.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMeta {
    /// When the report was produced; selects the calendar week
    pub generated_at: DateTime<FixedOffset>,

    /// Most expensive tier used across all decisions
    pub highest_tier: Option<String>,

    /// Tier the cost estimate is based on
    pub cost_tier: String,

    /// Estimated USD cost
    pub estimated_cost: f64,

    /// Accepted outputs that hit the output budget
    pub truncated_outputs: usize,

    /// Short prompt fingerprint
    pub prompt_fingerprint: String,
}

/// Lay out title page, decision sections and technical notes.
pub fn build_story(records: &[DecisionRecord], meta: &ReportMeta, settings: &ReportSettings) -> Vec<Block> {
    let mut story = Vec::new();
    let (week, year) = iso_week(&meta.generated_at);

    // Title page
    story.push(Block::Spacer(50.0));
    story.push(Block::Title(settings.organization.clone()));
    story.push(Block::Spacer(10.0));
    story.push(Block::Title(settings.title.clone()));
    story.push(Block::Spacer(30.0));
    story.push(Block::KeyValueTable(vec![
        ("Kalenderwoche:".to_string(), format!("{week} / {year}")),
        ("Erstellt am:".to_string(), format_date(&meta.generated_at)),
    ]));
    story.push(Block::PageBreak);

    // Decisions
    story.push(Block::Heading1("Zusammenfassungen der Entscheidungen".to_string()));
    story.push(Block::Spacer(7.0));

    if records.is_empty() {
        story.push(Block::text("In dieser Woche konnten keine Entscheidungen verarbeitet werden."));
    }

    for record in records {
        story.push(Block::Heading2(record.heading()));
        story.push(Block::text(format!("Veröffentlicht: {}", format_published(&record.published))));
        story.push(Block::text(format!("Link: {}", record.detail_link)));
        story.push(Block::Spacer(3.5));

        if let Some(headnote) = &record.headnote {
            story.push(Block::Heading3("Leitsätze:".to_string()));
            story.push(Block::prose(headnote.clone()));
            story.push(Block::Spacer(3.5));
        }

        story.push(Block::Heading3("Kurz-Zusammenfassung:".to_string()));
        story.push(Block::prose(record.summary.clone()));
        story.push(Block::Spacer(7.0));
    }

    // Technical notes
    story.push(Block::PageBreak);
    story.push(Block::Heading1("Technische Hinweise".to_string()));
    story.push(Block::Spacer(3.5));

    let model = meta.highest_tier.as_deref().unwrap_or("kein Modell");
    story.push(Block::text(format!(
        "Die Zusammenfassungen wurden automatisch erstellt; höchstes verwendetes Modell: {model}."
    )));

    if !records.is_empty() {
        story.push(Block::Spacer(3.5));
        story.push(Block::Heading3("Modelle je Entscheidung:".to_string()));
        let rows = records
            .iter()
            .map(|r| {
                let tier = r.tier_used.as_ref().map(|t| t.name.clone()).unwrap_or_else(|| "-".to_string());
                (r.case_number.clone(), tier)
            })
            .collect();
        story.push(Block::KeyValueTable(rows));
    }

    story.push(Block::Spacer(3.5));
    story.push(Block::text(format!(
        "Geschätzte API-Kosten für diese Woche: ca. {} USD (Basis: {}).",
        format_cost(meta.estimated_cost),
        meta.cost_tier
    )));
    story.push(Block::text(format!(
        "Wegen des Ausgabelimits gekürzte Modellantworten: {}.",
        meta.truncated_outputs
    )));
    story.push(Block::text(format!("Prompt-Fingerabdruck: {}", meta.prompt_fingerprint)));
    story.push(Block::Spacer(3.5));
    story.push(Block::text(settings.source_note.clone()));

    story
}
