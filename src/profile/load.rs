use super::types::ProfileRecord;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse fetcher output into profile records.
///
/// Accepts a JSON array of items or a single item object. Entries that are
/// not objects are skipped with a warning rather than failing the batch.
pub fn parse_profiles(json: &str) -> Result<Vec<ProfileRecord>> {
    let value: Value = serde_json::from_str(json).context("Failed to parse profile JSON")?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        other => anyhow::bail!(
            "Expected a JSON array of profiles, found {}",
            json_kind(&other)
        ),
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if item.is_object() {
            records.push(ProfileRecord::from_value(item));
        } else {
            tracing::warn!(index = i, kind = json_kind(item), "skipping non-object profile entry");
        }
    }
    Ok(records)
}

/// Load profile records from a JSON file on disk
pub fn load_profiles(path: &Path) -> Result<Vec<ProfileRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file at {}", path.display()))?;
    parse_profiles(&content).with_context(|| format!("Invalid profile file {}", path.display()))
}

/// Keep the first record for each profile key, preserving input order.
/// Records without any identifying key are always kept.
pub fn dedupe_profiles(records: Vec<ProfileRecord>) -> Vec<ProfileRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| {
            let key = record.key();
            key.is_empty() || seen.insert(key)
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
