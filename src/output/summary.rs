use owo_colors::OwoColorize;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::profile::ProfileRecord;
use crate::scoring::{ScoreResult, Tier};

const UNKNOWN_LOCATION: &str = "Unknown";

/// Aggregate statistics over one scored batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_profiles: usize,
    /// Always carries A, B and C, even at zero
    pub tiers: BTreeMap<Tier, usize>,
    pub categories: BTreeMap<String, usize>,
    pub locations: BTreeMap<String, usize>,
    /// Mean final score rounded to two decimals; 0 for an empty batch
    pub average_score: f64,
}

pub fn summarize(scored: &[(ProfileRecord, ScoreResult)]) -> Summary {
    let mut tiers: BTreeMap<Tier, usize> = [Tier::A, Tier::B, Tier::C]
        .into_iter()
        .map(|tier| (tier, 0))
        .collect();
    let mut categories = BTreeMap::new();
    let mut locations = BTreeMap::new();
    let mut total_score = 0.0;

    for (record, result) in scored {
        *tiers.entry(result.tier).or_insert(0) += 1;
        for label in result.category_labels() {
            *categories.entry(label.to_string()).or_insert(0) += 1;
        }
        let location = record.location.display();
        let location = if location.is_empty() {
            UNKNOWN_LOCATION.to_string()
        } else {
            location
        };
        *locations.entry(location).or_insert(0) += 1;
        total_score += result.final_score;
    }

    let average_score = if scored.is_empty() {
        0.0
    } else {
        (total_score / scored.len() as f64 * 100.0).round() / 100.0
    };

    Summary {
        total_profiles: scored.len(),
        tiers,
        categories,
        locations,
        average_score,
    }
}

/// Human-readable summary for the terminal
pub fn format_summary(summary: &Summary, use_colors: bool) -> String {
    let mut lines = vec![format!(
        "Profiles: {}  Average score: {:.2}",
        summary.total_profiles, summary.average_score
    )];

    let tiers = summary
        .tiers
        .iter()
        .map(|(tier, count)| format!("{}={}", tier, count))
        .collect::<Vec<_>>()
        .join("  ");
    lines.push(format!("Tiers: {}", tiers));

    for (heading, counts) in [("Categories", &summary.categories), ("Locations", &summary.locations)] {
        if counts.is_empty() {
            continue;
        }
        if use_colors {
            lines.push(format!("{}:", heading.bold()));
        } else {
            lines.push(format!("{}:", heading));
        }
        // Most frequent first, ties by name
        let mut sorted: Vec<_> = counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (name, count) in sorted {
            lines.push(format!("  {:>4}  {}", count, name));
        }
    }

    lines.join("\n")
}
