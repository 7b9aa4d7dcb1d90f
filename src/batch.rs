use anyhow::Result;
use std::cmp::Ordering;
use std::path::PathBuf;

use crate::profile::{dedupe_profiles, load_profiles, ProfileRecord};
use crate::scoring::{score, RuleSet, ScoreResult};

/// Load profiles from every input file, deduplicate, score, and sort by
/// score descending.
///
/// Unreadable files are reported and skipped; the batch only fails when
/// every input failed.
pub fn load_and_score_profiles(
    inputs: &[PathBuf],
    rules: &RuleSet,
) -> Result<Vec<(ProfileRecord, ScoreResult)>> {
    let mut all_records = Vec::new();
    let mut any_succeeded = false;

    for path in inputs {
        match load_profiles(path) {
            Ok(records) => {
                tracing::info!(path = %path.display(), count = records.len(), "loaded profiles");
                all_records.extend(records);
                any_succeeded = true;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "skipping input: {:#}", e);
            }
        }
    }

    if !any_succeeded && !inputs.is_empty() {
        anyhow::bail!("All input files failed to load. Check the paths and file contents.");
    }

    let unique = dedupe_profiles(all_records);
    tracing::debug!(count = unique.len(), "after deduplication");

    Ok(score_profiles(unique, rules))
}

/// Score records and sort by score descending, then name ascending
pub fn score_profiles(
    records: Vec<ProfileRecord>,
    rules: &RuleSet,
) -> Vec<(ProfileRecord, ScoreResult)> {
    let mut scored: Vec<_> = records
        .into_iter()
        .map(|record| {
            let result = score(&record, rules);
            (record, result)
        })
        .collect();

    scored.sort_by(|a, b| {
        b.1.final_score
            .partial_cmp(&a.1.final_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.display_name().cmp(b.0.display_name()))
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn rules() -> RuleSet {
        RuleSet::default()
    }

    #[test]
    fn test_sorted_by_score_then_name() {
        let records = vec![
            ProfileRecord {
                full_name: "Zed".to_string(),
                ..Default::default()
            },
            ProfileRecord {
                full_name: "Bea".to_string(),
                headline: "Building in stealth".to_string(),
                ..Default::default()
            },
            ProfileRecord {
                full_name: "Al".to_string(),
                ..Default::default()
            },
        ];
        let scored = score_profiles(records, &rules());
        let names: Vec<_> = scored.iter().map(|(r, _)| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["Bea", "Al", "Zed"]);
    }

    #[test]
    fn test_load_skips_bad_files_and_dedupes() {
        let good = env::temp_dir().join("stealth_scout_test_batch_good.json");
        let dup = env::temp_dir().join("stealth_scout_test_batch_dup.json");
        let missing = env::temp_dir().join("stealth_scout_test_batch_missing.json");
        let _ = fs::remove_file(&missing);
        fs::write(
            &good,
            r#"[{"fullName": "Ana", "url": "https://linkedin.com/in/ana", "headline": "Stealth"}]"#,
        )
        .unwrap();
        fs::write(&dup, r#"[{"fullName": "Ana again", "url": "https://linkedin.com/in/ana/"}]"#)
            .unwrap();

        let scored =
            load_and_score_profiles(&[good.clone(), missing, dup.clone()], &rules()).unwrap();
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].0.full_name, "Ana");

        let _ = fs::remove_file(&good);
        let _ = fs::remove_file(&dup);
    }

    #[test]
    fn test_all_inputs_failing_is_error() {
        let missing = env::temp_dir().join("stealth_scout_test_batch_all_missing.json");
        let _ = fs::remove_file(&missing);
        let err = load_and_score_profiles(&[missing], &rules()).unwrap_err();
        assert!(err.to_string().contains("All input files failed"));
    }

    #[test]
    fn test_no_inputs_is_empty() {
        assert!(load_and_score_profiles(&[], &rules()).unwrap().is_empty());
    }
}
