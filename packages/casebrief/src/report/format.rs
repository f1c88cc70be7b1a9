//! Date, file name and number formatting used in the report.

use chrono::{DateTime, Datelike, FixedOffset};

/// `04.09.2025, 10:00 Uhr`, in the timestamp's own offset.
pub fn format_published(published: &DateTime<FixedOffset>) -> String {
    published.format("%d.%m.%Y, %H:%M Uhr").to_string()
}

/// `04.09.2025`
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// ISO calendar week and ISO week-based year.
pub fn iso_week(date: &DateTime<FixedOffset>) -> (u32, i32) {
    let week = date.iso_week();
    (week.week(), week.year())
}

/// `<prefix>_KW<week>_<year>.pdf`
pub fn report_file_name(prefix: &str, generated_at: &DateTime<FixedOffset>) -> String {
    let (week, year) = iso_week(generated_at);
    format!("{prefix}_KW{week}_{year}.pdf")
}

/// Cost in USD without trailing zeros, e.g. `0.017`.
pub fn format_cost(usd: f64) -> String {
    format!("{usd}")
}
