use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::profile::ProfileRecord;
use crate::scoring::{ScoreResult, Tier};

/// A profile with its score result, borrowed for display
pub struct ScoredProfile<'a> {
    pub record: &'a ProfileRecord,
    pub result: &'a ScoreResult,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with at most one decimal ("78", "7.5")
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    formatted
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(formatted)
}

fn colored_tier(tier: Tier) -> String {
    match tier {
        Tier::A => tier.as_str().green().bold().to_string(),
        Tier::B => tier.as_str().yellow().to_string(),
        Tier::C => tier.as_str().dimmed().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format profiles as a ranked table: Index, Score, Tier, Name, Headline, URL.
/// Index column: 3 chars (fits "99."), right-aligned.
/// Score column is right-aligned, 5 chars wide (fits "100.0").
pub fn format_scored_table(profiles: &[ScoredProfile], use_colors: bool) -> String {
    if profiles.is_empty() {
        return "No profiles found.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 4;
    let score_width = 5;
    let separator = "  ";

    profiles
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>3}.", idx + 1);
            let score_padded = format!(
                "{:>width$}",
                format_score(scored.result.final_score),
                width = score_width
            );
            let name = scored.record.display_name();
            let url = scored.record.url.as_str();

            // index, score, tier (1 char) and name/url are fixed; headline gets the rest
            let fixed_width = index_width
                + 1
                + score_width
                + 1
                + separator.len() * 4
                + name.chars().count()
                + url.len();
            let headline = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_text(&scored.record.headline, width - fixed_width)
                }
                Some(_) => truncate_text(&scored.record.headline, 20),
                None => scored.record.headline.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    colored_tier(scored.result.tier),
                    separator,
                    name.bold(),
                    separator,
                    headline,
                    separator,
                    url.underline()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    index_str,
                    score_padded,
                    separator,
                    scored.result.tier,
                    separator,
                    name,
                    separator,
                    headline,
                    separator,
                    url
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format profiles as tab-separated values for scripting
/// Columns: score, tier, name, headline, url (no headers, no colors)
pub fn format_tsv(profiles: &[ScoredProfile]) -> String {
    if profiles.is_empty() {
        return String::new();
    }

    profiles
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                format_score(scored.result.final_score),
                scored.result.tier,
                tsv_field(scored.record.display_name()),
                tsv_field(&scored.record.headline),
                scored.record.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn tsv_field(text: &str) -> String {
    text.replace(['\t', '\n', '\r'], " ")
}

/// Format one profile with its score breakdown (for verbose mode)
pub fn format_profile_detail(scored: &ScoredProfile, use_colors: bool) -> String {
    let record = scored.record;
    let result = scored.result;

    let categories = if result.categories.is_empty() {
        "-".to_string()
    } else {
        result.category_labels().join(", ")
    };
    let location = record.location.display();

    let mut lines = Vec::new();
    if use_colors {
        lines.push(format!(
            "{}  {} ({})",
            record.display_name().bold(),
            format_score(result.final_score).bold(),
            colored_tier(result.tier)
        ));
    } else {
        lines.push(format!(
            "{}  {} ({})",
            record.display_name(),
            format_score(result.final_score),
            result.tier
        ));
    }
    lines.push(format!("  Headline: {}", record.headline));
    lines.push(format!(
        "  Location: {}",
        if location.is_empty() { "-" } else { location.as_str() }
    ));
    lines.push(format!("  Categories: {}", categories));
    lines.push(format!(
        "  Raw: {}  Penalty: {}",
        format_score(result.raw_score),
        format_score(result.penalty)
    ));
    for contribution in &result.breakdown {
        let points = format!("{:+.1}", contribution.points);
        let line = format!(
            "    {:<24} {:>6}  ({} hit{})",
            contribution.name,
            points,
            contribution.hits,
            if contribution.hits == 1 { "" } else { "s" }
        );
        if use_colors && contribution.points < 0.0 {
            lines.push(line.red().to_string());
        } else {
            lines.push(line);
        }
    }
    if use_colors {
        lines.push(format!("  URL: {}", record.url.underline()));
    } else {
        lines.push(format!("  URL: {}", record.url));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Location;
    use crate::scoring::{score, RuleSet};

    fn sample() -> (ProfileRecord, ScoreResult) {
        let record = ProfileRecord {
            full_name: "Asha Rao".to_string(),
            url: "https://www.linkedin.com/in/asharao".to_string(),
            headline: "Building AI healthtech startup in stealth | Ex-Google | Stanford 2024"
                .to_string(),
            location: Location {
                full: "Bangalore".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let result = score(&record, &RuleSet::default());
        (record, result)
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(78.0), "78");
        assert_eq!(format_score(7.5), "7.5");
        assert_eq!(format_score(0.0), "0");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Short", 20), "Short");
        assert_eq!(truncate_text("This is a very long headline", 15), "This is a ve...");
        assert_eq!(truncate_text("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_scored_table_empty() {
        assert_eq!(format_scored_table(&[], false), "No profiles found.");
    }

    #[test]
    fn test_format_scored_table_single() {
        let (record, result) = sample();
        let rows = vec![ScoredProfile {
            record: &record,
            result: &result,
        }];
        let table = format_scored_table(&rows, false);
        assert!(table.starts_with("  1."));
        assert!(table.contains("Asha Rao"));
        assert!(table.contains("  A  "));
        assert!(table.contains("https://www.linkedin.com/in/asharao"));
    }

    #[test]
    fn test_format_tsv() {
        let (record, result) = sample();
        let rows = vec![ScoredProfile {
            record: &record,
            result: &result,
        }];
        let tsv = format_tsv(&rows);
        let fields: Vec<&str> = tsv.split('\t').collect();
        assert_eq!(fields.len(), 5);
        assert_eq!(fields[1], "A");
        assert_eq!(fields[2], "Asha Rao");
        assert_eq!(fields[4], "https://www.linkedin.com/in/asharao");
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_tsv_field_strips_tabs() {
        assert_eq!(tsv_field("a\tb\nc"), "a b c");
    }

    #[test]
    fn test_format_profile_detail() {
        let (record, result) = sample();
        let detail = format_profile_detail(
            &ScoredProfile {
                record: &record,
                result: &result,
            },
            false,
        );
        assert!(detail.starts_with("Asha Rao"));
        assert!(detail.contains("Categories: Health x AI"));
        assert!(detail.contains("Location: Bangalore"));
        assert!(detail.contains("stealth"));
        assert!(detail.contains("+20.0"));
    }
}
