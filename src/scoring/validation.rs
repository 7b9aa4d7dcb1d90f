use std::collections::HashSet;

use super::config::{RuleSet, SignalRule};
use super::factors::Source;

/// Validate a rule set before any profile is scored.
/// Returns all validation errors at once (not just the first).
pub fn validate_rules(rules: &RuleSet) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if !rules.scale_max.is_finite() || rules.scale_max <= 0.0 {
        errors.push("rules.scale_max: must be a positive number".to_string());
    }

    let (a, b) = (rules.tiers.a, rules.tiers.b);
    if !a.is_finite() || !b.is_finite() || b <= 0.0 || b > a || a > 1.0 {
        errors.push(format!(
            "rules.tiers: thresholds must satisfy 0 < b <= a <= 1 (got a={}, b={})",
            a, b
        ));
    }

    let mut group_names = HashSet::new();
    for (i, group) in rules.groups.iter().enumerate() {
        if group.name.trim().is_empty() {
            errors.push(format!("rules.groups[{}].name: must not be empty", i));
        } else if !group_names.insert(group.name.as_str()) {
            errors.push(format!("rules.groups[{}].name: duplicate group '{}'", i, group.name));
        }
        if !group.max_points.is_finite() || group.max_points < 0.0 {
            errors.push(format!(
                "rules.groups[{}].max_points: must be a non-negative number",
                i
            ));
        }
    }

    // Names are shared between signals and penalties so conditions can
    // reference either list
    let mut rule_names = HashSet::new();
    let all_rules = rules
        .signals
        .iter()
        .enumerate()
        .map(|(i, rule)| (format!("rules.signals[{}]", i), rule))
        .chain(
            rules
                .penalties
                .iter()
                .enumerate()
                .map(|(i, rule)| (format!("rules.penalties[{}]", i), rule)),
        )
        .collect::<Vec<_>>();

    for (path, rule) in &all_rules {
        if rule.name.trim().is_empty() {
            errors.push(format!("{}.name: must not be empty", path));
        } else if !rule_names.insert(rule.name.as_str()) {
            errors.push(format!("{}.name: duplicate rule '{}'", path, rule.name));
        }
    }

    for (path, rule) in &all_rules {
        validate_rule(path, rule, &rule_names, &group_names, &mut errors);
    }

    validate_conditions_keep_signals_positive(rules, &mut errors);

    let categories = [
        ("health", &rules.categories.health),
        ("ai", &rules.categories.ai),
        ("consumer", &rules.categories.consumer),
    ];
    for (key, name) in categories {
        if let Some(name) = name {
            if !rule_names.contains(name.as_str()) {
                errors.push(format!(
                    "rules.categories.{}: unknown signal '{}'",
                    key, name
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rule(
    path: &str,
    rule: &SignalRule,
    rule_names: &HashSet<&str>,
    group_names: &HashSet<&str>,
    errors: &mut Vec<String>,
) {
    if !rule.weight.is_finite() {
        errors.push(format!("{}.weight: must be a finite number", path));
    } else if rule.weight < 0.0 {
        errors.push(format!(
            "{}.weight: must be non-negative (use penalties for deductions)",
            path
        ));
    }

    if rule.cap == Some(0) {
        errors.push(format!("{}.cap: must be at least 1", path));
    }

    if rule.source.needs_keywords() && rule.keywords.iter().all(|k| k.trim().is_empty()) {
        errors.push(format!("{}.keywords: required for source {:?}", path, rule.source));
    }
    if rule.keywords.iter().any(|k| k.trim().is_empty()) {
        errors.push(format!("{}.keywords: must not contain empty keywords", path));
    }

    match rule.source {
        Source::RoleAt if rule.companies.iter().all(|c| c.trim().is_empty()) => {
            errors.push(format!("{}.companies: required for source RoleAt", path));
        }
        Source::Followers if rule.threshold.is_none() => {
            errors.push(format!("{}.threshold: required for source Followers", path));
        }
        _ => {}
    }

    if let Some(ref group) = rule.group {
        if !group_names.contains(group.as_str()) {
            errors.push(format!("{}.group: unknown group '{}'", path, group));
        }
    }

    for (field, names) in [("requires", &rule.requires), ("unless", &rule.unless)] {
        for name in names {
            if name == &rule.name {
                errors.push(format!("{}.{}: rule cannot reference itself", path, field));
            } else if !rule_names.contains(name.as_str()) {
                errors.push(format!("{}.{}: unknown rule '{}'", path, field, name));
            }
        }
    }
}

/// Matching one more signal must never lower a score. Two conditions can
/// break that: a penalty that `requires` a signal, and a signal switched off
/// by a signal that may be worth less than it.
fn validate_conditions_keep_signals_positive(rules: &RuleSet, errors: &mut Vec<String>) {
    let signal = |name: &str| rules.signals.iter().find(|rule| rule.name == name);

    for (i, penalty) in rules.penalties.iter().enumerate() {
        for name in &penalty.requires {
            if signal(name).is_some() {
                errors.push(format!(
                    "rules.penalties[{}].requires: a penalty cannot require signal '{}'",
                    i, name
                ));
            }
        }
    }

    for (i, rule) in rules.signals.iter().enumerate() {
        let most = rule.weight * f64::from(rule.cap.unwrap_or(1));
        for name in &rule.unless {
            let Some(other) = signal(name) else { continue };
            if other.name == rule.name {
                continue;
            }
            if guaranteed_points(other) < most {
                errors.push(format!(
                    "rules.signals[{}].unless: signal '{}' can be worth less than '{}'",
                    i, name, rule.name
                ));
            }
        }
    }
}

/// Points a signal is sure to add whenever it triggers. Grouped or
/// conditional signals can trigger and still add nothing.
fn guaranteed_points(rule: &SignalRule) -> f64 {
    if rule.group.is_some() || !rule.requires.is_empty() || !rule.unless.is_empty() {
        0.0
    } else {
        rule.weight
    }
}
