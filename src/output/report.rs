use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::summary::Summary;
use crate::outreach::conversation_starter;
use crate::profile::ProfileRecord;
use crate::scoring::{ScoreResult, Tier};

const LIST_SEPARATOR: &str = "; ";

/// One profile as written to the JSON report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub url: String,
    pub headline: String,
    pub location: String,
    pub score: f64,
    pub tier: Tier,
    /// Rule name to signed points
    pub breakdown: BTreeMap<String, f64>,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub conversation_starter: String,
}

impl ReportRow {
    pub fn new(record: &ProfileRecord, result: &ScoreResult) -> Self {
        Self {
            name: record.full_name.clone(),
            url: record.url.clone(),
            headline: record.headline.clone(),
            location: record.location.display(),
            score: result.final_score,
            tier: result.tier,
            breakdown: result
                .breakdown
                .iter()
                .map(|c| (c.name.clone(), c.points))
                .collect(),
            categories: result
                .category_labels()
                .into_iter()
                .map(str::to_string)
                .collect(),
            email: record.email.clone().filter(|e| !e.trim().is_empty()),
            conversation_starter: conversation_starter(record, result),
        }
    }
}

/// Flat CSV shape; lists are joined with "; "
#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    url: &'a str,
    headline: &'a str,
    location: &'a str,
    score: f64,
    tier: Tier,
    categories: String,
    breakdown: String,
    email: &'a str,
    conversation_starter: &'a str,
}

impl<'a> From<&'a ReportRow> for CsvRow<'a> {
    fn from(row: &'a ReportRow) -> Self {
        Self {
            name: &row.name,
            url: &row.url,
            headline: &row.headline,
            location: &row.location,
            score: row.score,
            tier: row.tier,
            categories: row.categories.join(LIST_SEPARATOR),
            breakdown: row
                .breakdown
                .iter()
                .map(|(name, points)| format!("{}={:+}", name, points))
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            email: row.email.as_deref().unwrap_or(""),
            conversation_starter: &row.conversation_starter,
        }
    }
}

pub fn build_rows(scored: &[(ProfileRecord, ScoreResult)]) -> Vec<ReportRow> {
    scored
        .iter()
        .map(|(record, result)| ReportRow::new(record, result))
        .collect()
}

pub fn render_json(rows: &[ReportRow]) -> Result<String> {
    serde_json::to_string_pretty(rows).context("Failed to serialize report rows")
}

/// Render rows as CSV with a header row. An empty slice still gets the
/// header so downstream tools see the columns.
pub fn render_csv(rows: &[ReportRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record([
            "name",
            "url",
            "headline",
            "location",
            "score",
            "tier",
            "categories",
            "breakdown",
            "email",
            "conversation_starter",
        ])
        .context("Failed to write CSV header")?;
    for row in rows {
        writer
            .serialize(CsvRow::from(row))
            .with_context(|| format!("Failed to write CSV row for {}", row.url))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Write every report into `out_dir`, creating it if needed.
/// Returns the paths written, in write order.
pub fn write_reports(out_dir: &Path, rows: &[ReportRow], summary: &Summary) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory at {}", out_dir.display()))?;

    let tier_rows = |tier: Tier| -> Vec<ReportRow> {
        rows.iter().filter(|row| row.tier == tier).cloned().collect()
    };
    let summary_json =
        serde_json::to_string_pretty(summary).context("Failed to serialize summary")?;

    let reports = [
        ("scored.json", render_json(rows)?),
        ("scored.csv", render_csv(rows)?),
        ("summary.json", summary_json),
        ("tier_a.csv", render_csv(&tier_rows(Tier::A))?),
        ("tier_b.csv", render_csv(&tier_rows(Tier::B))?),
    ];

    let mut written = Vec::with_capacity(reports.len());
    for (file_name, content) in reports {
        let path = out_dir.join(file_name);
        write_atomic(&path, content.as_bytes())?;
        tracing::debug!(path = %path.display(), "wrote report");
        written.push(path);
    }
    Ok(written)
}

fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    Ok(())
}
