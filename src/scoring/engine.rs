use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use super::config::{RuleSet, SignalRule};
use super::factors::{matches_any, ProfileText, Source};
use crate::profile::ProfileRecord;

// Tolerance for float drift when comparing against tier thresholds
const TIER_EPSILON: f64 = 1e-9;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    /// Map a final score onto a tier; thresholds are closed lower bounds
    pub fn classify(score: f64, rules: &RuleSet) -> Self {
        if score + TIER_EPSILON >= rules.tier_a_threshold() {
            Tier::A
        } else if score + TIER_EPSILON >= rules.tier_b_threshold() {
            Tier::B
        } else {
            Tier::C
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
        }
    }

    /// True when this tier is `min` or better
    pub fn at_least(self, min: Tier) -> bool {
        self <= min
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Industry category; a record carries at most one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Health x AI")]
    HealthAi,
    #[serde(rename = "Health")]
    Health,
    #[serde(rename = "Consumer x AI")]
    ConsumerAi,
    #[serde(rename = "Consumer Tech")]
    ConsumerTech,
}

impl Category {
    /// Health takes precedence over consumer; AI upgrades whichever applies.
    /// AI alone produces no category.
    pub fn from_flags(health: bool, ai: bool, consumer: bool) -> Option<Self> {
        match (health, consumer, ai) {
            (true, _, true) => Some(Category::HealthAi),
            (true, _, false) => Some(Category::Health),
            (false, true, true) => Some(Category::ConsumerAi),
            (false, true, false) => Some(Category::ConsumerTech),
            (false, false, _) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::HealthAi => "Health x AI",
            Category::Health => "Health",
            Category::ConsumerAi => "Consumer x AI",
            Category::ConsumerTech => "Consumer Tech",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalContribution {
    pub name: String,
    pub hits: u32,
    /// Signed points: positive for signals, negative for penalties
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Sum of signal points before penalties
    pub raw_score: f64,
    /// Total points deducted by penalties (non-negative)
    pub penalty: f64,
    /// `raw_score - penalty`, clamped to `[0, scale_max]`
    pub final_score: f64,
    pub tier: Tier,
    /// Every applied rule in evaluation order, signals before penalties
    pub breakdown: Vec<SignalContribution>,
    pub categories: BTreeSet<Category>,
}

impl ScoreResult {
    /// Points contributed by the named rule, if it applied
    pub fn contribution(&self, name: &str) -> Option<f64> {
        self.breakdown
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.points)
    }

    pub fn primary_category(&self) -> Option<Category> {
        self.categories.iter().next().copied()
    }

    /// Category labels joined for display, empty when uncategorised
    pub fn category_labels(&self) -> Vec<&'static str> {
        self.categories.iter().map(Category::label).collect()
    }
}

/// Score a single profile. Pure: the same record and rules always produce
/// the same result.
pub fn score(record: &ProfileRecord, rules: &RuleSet) -> ScoreResult {
    let text = ProfileText::from_record(record);

    let signal_hits: Vec<u32> = rules
        .signals
        .iter()
        .map(|rule| trigger_hits(rule, record, &text, rules))
        .collect();
    let penalty_hits: Vec<u32> = rules
        .penalties
        .iter()
        .map(|rule| trigger_hits(rule, record, &text, rules))
        .collect();

    // Trigger state, before any requires/unless conditions
    let matched: HashSet<&str> = rules
        .signals
        .iter()
        .zip(&signal_hits)
        .chain(rules.penalties.iter().zip(&penalty_hits))
        .filter(|(_, hits)| **hits > 0)
        .map(|(rule, _)| rule.name.as_str())
        .collect();

    let mut budget = GroupBudget::new(rules);
    let mut breakdown = Vec::new();

    let mut raw_score = 0.0;
    for (rule, &hits) in rules.signals.iter().zip(&signal_hits) {
        if let Some(points) = applied_points(rule, hits, &matched, &mut budget) {
            raw_score += points;
            breakdown.push(SignalContribution {
                name: rule.name.clone(),
                hits,
                points,
            });
        }
    }

    let mut penalty = 0.0;
    for (rule, &hits) in rules.penalties.iter().zip(&penalty_hits) {
        if let Some(points) = applied_points(rule, hits, &matched, &mut budget) {
            penalty += points;
            breakdown.push(SignalContribution {
                name: rule.name.clone(),
                hits,
                points: -points,
            });
        }
    }

    // max/min instead of clamp: never panics on a malformed scale
    let final_score = (raw_score - penalty).max(0.0).min(rules.scale_max);

    let flag = |name: &Option<String>| name.as_deref().is_some_and(|n| matched.contains(n));
    let categories = Category::from_flags(
        flag(&rules.categories.health),
        flag(&rules.categories.ai),
        flag(&rules.categories.consumer),
    )
    .into_iter()
    .collect();

    ScoreResult {
        raw_score,
        penalty,
        final_score,
        tier: Tier::classify(final_score, rules),
        breakdown,
        categories,
    }
}

/// Score every record in order; an empty slice yields an empty vector
pub fn score_all(records: &[ProfileRecord], rules: &RuleSet) -> Vec<ScoreResult> {
    records.iter().map(|record| score(record, rules)).collect()
}

/// Remaining points per group, filled in rule order
struct GroupBudget<'a> {
    rules: &'a RuleSet,
    used: HashMap<&'a str, f64>,
}

impl<'a> GroupBudget<'a> {
    fn new(rules: &'a RuleSet) -> Self {
        Self {
            rules,
            used: HashMap::new(),
        }
    }

    fn take(&mut self, group: &'a str, points: f64) -> f64 {
        let Some(max) = self.rules.group_cap(group) else {
            return points;
        };
        let used = self.used.entry(group).or_insert(0.0);
        let granted = points.min((max - *used).max(0.0));
        *used += granted;
        granted
    }
}

/// Points for a rule whose conditions hold, or None when it does not apply
fn applied_points<'a>(
    rule: &'a SignalRule,
    hits: u32,
    matched: &HashSet<&str>,
    budget: &mut GroupBudget<'a>,
) -> Option<f64> {
    if hits == 0 {
        return None;
    }
    if !rule.requires.iter().all(|name| matched.contains(name.as_str())) {
        return None;
    }
    if rule.unless.iter().any(|name| matched.contains(name.as_str())) {
        return None;
    }

    let units = rule.cap.map_or(1, |cap| hits.min(cap));
    let points = rule.weight * f64::from(units);
    Some(match rule.group.as_deref() {
        Some(group) => budget.take(group, points),
        None => points,
    })
}

fn trigger_hits(rule: &SignalRule, record: &ProfileRecord, text: &ProfileText, rules: &RuleSet) -> u32 {
    let mode = rules.match_mode;
    let recent = |year: Option<i32>| year.is_some_and(|y| rules.recent_years.contains(&y));
    let count = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);

    match rule.source {
        Source::Keywords => text.count(rule.surface, &rule.keywords, mode),
        Source::RecentMention => {
            let years: Vec<String> = rules.recent_years.iter().map(i32::to_string).collect();
            text.count(rule.surface, &years, mode)
                .saturating_add(text.count(rule.surface, &rule.keywords, mode))
        }
        Source::RecentStart => count(
            record
                .experiences
                .iter()
                .filter(|exp| exp.is_current && recent(exp.start_year))
                .count(),
        ),
        Source::RecentEnd => count(
            record
                .experiences
                .iter()
                .filter(|exp| recent(exp.end_year))
                .count(),
        ),
        Source::RecentRole => count(
            record
                .experiences
                .iter()
                .filter(|exp| (exp.is_current && recent(exp.start_year)) || recent(exp.end_year))
                .count(),
        ),
        Source::Email => u32::from(record.has_email()),
        Source::Followers => {
            u32::from(rule.threshold.is_some_and(|t| record.follower_count > t))
        }
        Source::RoleAt => count(
            record
                .experiences
                .iter()
                .filter(|exp| {
                    matches_any(&exp.title, &rule.keywords, mode)
                        && matches_any(&exp.company, &rule.companies, mode)
                })
                .count(),
        ),
        Source::Always => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Experience, Location};
    use crate::scoring::config::{CategorySignals, GroupCap, TierThresholds};
    use crate::scoring::factors::{MatchMode, Surface};

    fn rules_with(signals: Vec<SignalRule>, penalties: Vec<SignalRule>) -> RuleSet {
        RuleSet {
            scale_max: 100.0,
            tiers: TierThresholds::default(),
            recent_years: vec![2023, 2024],
            match_mode: MatchMode::Substring,
            groups: Vec::new(),
            categories: CategorySignals::default(),
            signals,
            penalties,
        }
    }

    fn headline(text: &str) -> ProfileRecord {
        ProfileRecord {
            headline: text.to_string(),
            ..Default::default()
        }
    }

    fn stealth_rules() -> RuleSet {
        RuleSet::default().with_recent_years(&[2023, 2024])
    }

    #[test]
    fn test_empty_record_scores_zero() {
        let result = score(&ProfileRecord::default(), &stealth_rules());
        assert_eq!(result.final_score, 0.0);
        assert_eq!(result.tier, Tier::C);
        assert!(result.categories.is_empty());
    }

    #[test]
    fn test_score_is_deterministic() {
        let record = headline("Building AI healthtech startup in stealth");
        let rules = stealth_rules();
        assert_eq!(score(&record, &rules), score(&record, &rules));
    }

    fn stealth_founder() -> ProfileRecord {
        ProfileRecord {
            full_name: "Asha Rao".to_string(),
            headline: "Building AI healthtech startup in stealth | Ex-Google | Stanford 2024"
                .to_string(),
            location: Location {
                full: "Bangalore".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_stealth_founder_in_bangalore_is_tier_a() {
        let result = score(&stealth_founder(), &stealth_rules());

        assert_eq!(result.contribution("stealth"), Some(20.0));
        assert_eq!(result.contribution("recent_mention"), Some(10.0));
        assert_eq!(result.contribution("building_without_role"), Some(8.0));
        assert_eq!(result.contribution("top_company"), Some(12.0));
        assert_eq!(result.contribution("top_school"), Some(10.0));
        assert_eq!(result.contribution("geography"), Some(10.0));
        assert_eq!(result.contribution("no_founder_signal"), None);
        assert!((result.final_score - 87.0).abs() < 1e-9);
        assert_eq!(result.tier, Tier::A);
        assert_eq!(result.primary_category(), Some(Category::HealthAi));
    }

    #[test]
    fn test_stealth_founder_is_tier_a_under_default_rules() {
        // Holds whether or not the headline year falls in the current window
        let result = score(&stealth_founder(), &RuleSet::default());
        assert!(result.final_score >= 77.0 - 1e-9);
        assert_eq!(result.tier, Tier::A);
        assert_eq!(result.primary_category(), Some(Category::HealthAi));

        let outside_window = RuleSet::default().with_recent_years(&[2030, 2031]);
        let result = score(&stealth_founder(), &outside_window);
        assert_eq!(result.contribution("recent_mention"), None);
        assert!((result.final_score - 77.0).abs() < 1e-9);
        assert_eq!(result.tier, Tier::A);
    }

    #[test]
    fn test_senior_vp_is_penalised_to_tier_c() {
        let record = ProfileRecord {
            headline: "VP of Engineering".to_string(),
            follower_count: 100_000,
            ..Default::default()
        };
        let result = score(&record, &stealth_rules());

        assert!(result.contribution("senior_title").is_some_and(|p| p < 0.0));
        assert!(result.contribution("large_following").is_some_and(|p| p < 0.0));
        assert!(result.penalty > 0.0);
        assert_eq!(result.final_score, 0.0);
        assert_eq!(result.tier, Tier::C);
    }

    #[test]
    fn test_adding_positive_signal_never_lowers_score() {
        let rules = stealth_rules();
        let base = ProfileRecord {
            headline: "Product manager".to_string(),
            about: "Working in payments".to_string(),
            experiences: vec![Experience {
                title: "Founder".to_string(),
                company: "Acme".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut richer = base.clone();
        richer.about.push_str(" and building with Y Combinator");

        assert!(score(&richer, &rules).final_score >= score(&base, &rules).final_score);
    }

    #[test]
    fn test_adding_penalty_phrase_never_raises_score() {
        let rules = stealth_rules();
        let base = ProfileRecord {
            headline: "Founder, fintech".to_string(),
            experiences: vec![Experience {
                title: "Founder".to_string(),
                company: "Acme".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut senior = base.clone();
        senior.headline.push_str(" | Senior Director");

        assert!(score(&senior, &rules).final_score <= score(&base, &rules).final_score);
    }

    #[test]
    fn test_tier_boundaries_are_inclusive() {
        let at = |weight: f64| {
            let rules = rules_with(
                vec![SignalRule::matching("x", Surface::Full, weight, &["stealth"])],
                Vec::new(),
            );
            score(&headline("stealth"), &rules).tier
        };
        assert_eq!(at(75.0), Tier::A);
        assert_eq!(at(74.99), Tier::B);
        assert_eq!(at(60.0), Tier::B);
        assert_eq!(at(59.99), Tier::C);
    }

    #[test]
    fn test_tiers_follow_scale() {
        let mut rules = rules_with(
            vec![SignalRule::matching("x", Surface::Full, 7.5, &["stealth"])],
            Vec::new(),
        );
        rules.scale_max = 10.0;
        let result = score(&headline("stealth"), &rules);
        assert_eq!(result.final_score, 7.5);
        assert_eq!(result.tier, Tier::A);
    }

    #[test]
    fn test_score_clamped_to_scale() {
        let rules = rules_with(
            vec![
                SignalRule::matching("a", Surface::Full, 80.0, &["stealth"]),
                SignalRule::matching("b", Surface::Full, 80.0, &["stealth"]),
            ],
            Vec::new(),
        );
        let result = score(&headline("stealth"), &rules);
        assert_eq!(result.raw_score, 160.0);
        assert_eq!(result.final_score, 100.0);
    }

    #[test]
    fn test_boolean_rule_counts_once() {
        let rules = rules_with(
            vec![SignalRule::matching("x", Surface::Full, 5.0, &["stealth", "building", "founder"])],
            Vec::new(),
        );
        let result = score(&headline("Founder building in stealth"), &rules);
        assert_eq!(result.breakdown[0].hits, 3);
        assert_eq!(result.final_score, 5.0);
    }

    #[test]
    fn test_countable_rule_is_capped() {
        let rules = rules_with(
            vec![SignalRule::matching("x", Surface::Full, 2.0, &["a1", "b2", "c3", "d4"]).with_cap(3)],
            Vec::new(),
        );
        assert_eq!(score(&headline("a1 b2"), &rules).final_score, 4.0);
        assert_eq!(score(&headline("a1 b2 c3 d4"), &rules).final_score, 6.0);
    }

    #[test]
    fn test_group_cap_fills_in_rule_order() {
        let mut rules = rules_with(
            vec![
                SignalRule::matching("ai", Surface::Full, 7.0, &["ai"]).in_group("industry"),
                SignalRule::matching("health", Surface::Full, 5.0, &["health"]).in_group("industry"),
                SignalRule::matching("fintech", Surface::Full, 5.0, &["fintech"]).in_group("industry"),
            ],
            Vec::new(),
        );
        rules.groups.push(GroupCap {
            name: "industry".to_string(),
            max_points: 15.0,
        });

        let result = score(&headline("ai health fintech"), &rules);
        assert_eq!(result.contribution("ai"), Some(7.0));
        assert_eq!(result.contribution("health"), Some(5.0));
        assert_eq!(result.contribution("fintech"), Some(3.0));
        assert_eq!(result.final_score, 15.0);
    }

    #[test]
    fn test_requires_and_unless() {
        let rules = rules_with(
            vec![
                SignalRule::matching("stealth", Surface::Full, 0.0, &["stealth"]),
                SignalRule::matching("founder", Surface::Full, 0.0, &["founder"]),
                SignalRule::from_source("stealth_founder", Source::Always, 30.0)
                    .requires(&["stealth", "founder"]),
                SignalRule::matching("building", Surface::Full, 6.0, &["building"])
                    .unless(&["founder"]),
            ],
            Vec::new(),
        );

        let both = score(&headline("founder in stealth"), &rules);
        assert_eq!(both.contribution("stealth_founder"), Some(30.0));

        let only_stealth = score(&headline("building in stealth"), &rules);
        assert_eq!(only_stealth.contribution("stealth_founder"), None);
        assert_eq!(only_stealth.contribution("building"), Some(6.0));

        let founder_building = score(&headline("founder building"), &rules);
        assert_eq!(founder_building.contribution("building"), None);
    }

    #[test]
    fn test_unless_can_reference_penalty() {
        let rules = rules_with(
            vec![SignalRule::matching("open", Surface::Full, 5.0, &["open to"]).unless(&["senior"])],
            vec![SignalRule::matching("senior", Surface::Headline, 2.0, &["senior"])],
        );
        let result = score(&headline("Senior engineer, open to work"), &rules);
        assert_eq!(result.contribution("open"), None);
        assert_eq!(result.contribution("senior"), Some(-2.0));
        assert_eq!(result.final_score, 0.0);
    }

    #[test]
    fn test_headline_surface_ignores_experience() {
        let rules = rules_with(
            vec![SignalRule::matching("stealth", Surface::Headline, 20.0, &["stealth"])],
            Vec::new(),
        );
        let record = ProfileRecord {
            experiences: vec![Experience {
                company: "Stealth Startup".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(score(&record, &rules).final_score, 0.0);
    }

    #[test]
    fn test_recency_sources() {
        let rules = rules_with(
            vec![
                SignalRule::from_source("start", Source::RecentStart, 1.0).with_cap(5),
                SignalRule::from_source("end", Source::RecentEnd, 1.0).with_cap(5),
                SignalRule::from_source("role", Source::RecentRole, 1.0).with_cap(5),
            ],
            Vec::new(),
        );
        let record = ProfileRecord {
            experiences: vec![
                Experience {
                    is_current: true,
                    start_year: Some(2024),
                    ..Default::default()
                },
                Experience {
                    is_current: false,
                    start_year: Some(2024),
                    end_year: Some(2024),
                    ..Default::default()
                },
                Experience {
                    is_current: false,
                    start_year: Some(2015),
                    end_year: Some(2018),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let result = score(&record, &rules);
        assert_eq!(result.contribution("start"), Some(1.0));
        assert_eq!(result.contribution("end"), Some(1.0));
        assert_eq!(result.contribution("role"), Some(2.0));
    }

    #[test]
    fn test_recent_mention_counts_years_and_keywords() {
        let rules = rules_with(
            vec![SignalRule::from_source("recent", Source::RecentMention, 1.0)
                .with_keywords(&["just launched"])
                .on(Surface::Headline)
                .with_cap(5)],
            Vec::new(),
        );
        let result = score(&headline("Just launched in 2024, since 2023"), &rules);
        assert_eq!(result.contribution("recent"), Some(3.0));
        assert_eq!(score(&headline("Since 2019"), &rules).contribution("recent"), None);
    }

    #[test]
    fn test_role_at_and_followers() {
        let rules = rules_with(
            Vec::new(),
            vec![
                SignalRule::from_source("bigco_exec", Source::RoleAt, 10.0)
                    .with_keywords(&["director"])
                    .with_companies(&["google"]),
                SignalRule::from_source("famous", Source::Followers, 5.0).with_threshold(50_000),
            ],
        );
        let mut record = ProfileRecord {
            follower_count: 50_000,
            experiences: vec![Experience {
                title: "Director of Product".to_string(),
                company: "Google".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let result = score(&record, &rules);
        assert_eq!(result.contribution("bigco_exec"), Some(-10.0));
        assert_eq!(result.contribution("famous"), None);

        record.follower_count = 50_001;
        record.experiences[0].company = "Acme".to_string();
        let result = score(&record, &rules);
        assert_eq!(result.contribution("bigco_exec"), None);
        assert_eq!(result.contribution("famous"), Some(-5.0));
    }

    #[test]
    fn test_word_mode_skips_partial_words() {
        let mut rules = rules_with(
            vec![SignalRule::matching("ai", Surface::Full, 7.0, &["ai"])],
            Vec::new(),
        );
        let record = headline("Retail operations lead");
        assert_eq!(score(&record, &rules).final_score, 7.0);

        rules.match_mode = MatchMode::Word;
        assert_eq!(score(&record, &rules).final_score, 0.0);
    }

    #[test]
    fn test_category_precedence() {
        assert_eq!(Category::from_flags(true, true, true), Some(Category::HealthAi));
        assert_eq!(Category::from_flags(true, false, true), Some(Category::Health));
        assert_eq!(Category::from_flags(false, true, true), Some(Category::ConsumerAi));
        assert_eq!(Category::from_flags(false, false, true), Some(Category::ConsumerTech));
        assert_eq!(Category::from_flags(false, true, false), None);
        assert_eq!(Category::from_flags(false, false, false), None);
    }

    #[test]
    fn test_zero_weight_marker_tags_category() {
        let rules = rules_with(
            vec![
                SignalRule::matching("health", Surface::Full, 0.0, &["clinic"]),
                SignalRule::matching("consumer", Surface::Full, 0.0, &["marketplace"]),
            ],
            Vec::new(),
        );
        let result = score(&headline("Clinic marketplace"), &rules);
        assert_eq!(result.final_score, 0.0);
        assert_eq!(result.category_labels(), vec!["Health"]);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::A.at_least(Tier::B));
        assert!(Tier::B.at_least(Tier::B));
        assert!(!Tier::C.at_least(Tier::B));
        assert_eq!(Tier::A.to_string(), "A");
    }

    #[test]
    fn test_score_all_empty() {
        assert!(score_all(&[], &stealth_rules()).is_empty());
    }

    #[test]
    fn test_score_all_preserves_order() {
        let records = vec![headline("stealth founder"), ProfileRecord::default()];
        let results = score_all(&records, &stealth_rules());
        assert_eq!(results.len(), 2);
        assert!(results[0].final_score > results[1].final_score);
    }
}
