use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::factors::{MatchMode, Source, Surface};
use super::presets::Preset;

/// Complete configuration for one scoring run.
///
/// Every keyword list, weight, cap and threshold lives here so that the
/// scorer itself holds no constants. Build it once, validate it with
/// [`validate_rules`](super::validate_rules), then share it read-only.
///
/// Example YAML:
/// ```yaml
/// scale_max: 100
/// tiers: { a: 0.75, b: 0.60 }
/// recent_years: [2025, 2026]
/// groups:
///   - { name: industry, max_points: 15 }
/// signals:
///   - { name: stealth, keywords: ["stealth", "building"], surface: headline, weight: 20 }
///   - { name: ai, keywords: [" ai ", "machine learning"], weight: 7, group: industry }
///   - { name: top_school, keywords: ["stanford", "iit "], surface: schools, weight: 2, cap: 3 }
/// penalties:
///   - { name: large_following, source: followers, threshold: 50000, weight: 5, unless: [stealth] }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    /// Upper bound of the final score (commonly 100 or 10)
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,

    /// Tier thresholds as fractions of `scale_max`
    #[serde(default)]
    pub tiers: TierThresholds,

    /// Years that count as "recent" for recency signals
    #[serde(default = "default_recent_years")]
    pub recent_years: Vec<i32>,

    /// How keywords are matched against profile text
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Point ceilings shared by several rules
    #[serde(default)]
    pub groups: Vec<GroupCap>,

    /// Which signals drive category tagging
    #[serde(default)]
    pub categories: CategorySignals,

    /// Positive signals, summed into the raw score
    #[serde(default)]
    pub signals: Vec<SignalRule>,

    /// Negative signals, subtracted after the raw score is known
    #[serde(default)]
    pub penalties: Vec<SignalRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Preset::default().rules()
    }
}

impl RuleSet {
    /// Absolute score needed for tier A
    pub fn tier_a_threshold(&self) -> f64 {
        self.tiers.a * self.scale_max
    }

    /// Absolute score needed for tier B
    pub fn tier_b_threshold(&self) -> f64 {
        self.tiers.b * self.scale_max
    }

    /// Replace the recent-year window, e.g. to pin scoring to a fixed date
    pub fn with_recent_years(mut self, years: &[i32]) -> Self {
        self.recent_years = years.to_vec();
        self
    }

    /// Look up a rule by name across signals and penalties
    pub fn rule(&self, name: &str) -> Option<&SignalRule> {
        self.signals
            .iter()
            .chain(self.penalties.iter())
            .find(|rule| rule.name == name)
    }

    pub fn group_cap(&self, name: &str) -> Option<f64> {
        self.groups
            .iter()
            .find(|group| group.name == name)
            .map(|group| group.max_points)
    }
}

/// Tier thresholds, closed lower bounds expressed as fractions of the scale.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TierThresholds {
    pub a: f64,
    pub b: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self { a: 0.75, b: 0.60 }
    }
}

/// Shared point ceiling for every rule tagged with `group: <name>`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GroupCap {
    pub name: String,
    pub max_points: f64,
}

/// Names of the signals whose matches produce category labels.
///
/// A category fires when its signal's trigger matched, regardless of
/// `requires`/`unless` conditions and of the signal's weight, so zero-weight
/// marker signals work as pure taggers.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CategorySignals {
    pub health: Option<String>,
    pub ai: Option<String>,
    pub consumer: Option<String>,
}

impl Default for CategorySignals {
    fn default() -> Self {
        Self {
            health: Some("health".to_string()),
            ai: Some("ai".to_string()),
            consumer: Some("consumer".to_string()),
        }
    }
}

/// One weighted rule.
///
/// Without `cap` the rule is boolean: it adds `weight` once when its trigger
/// matches. With `cap` it is countable and adds `weight × min(hits, cap)`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SignalRule {
    pub name: String,

    /// What produces hits (default: keyword matches)
    #[serde(default)]
    pub source: Source,

    /// Keywords for `keywords`, `recent_mention` and `role_at` (titles) sources
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Text searched by keyword sources (default: full profile text)
    #[serde(default)]
    pub surface: Surface,

    /// Company keywords for the `role_at` source
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companies: Vec<String>,

    /// Follower count that must be exceeded for the `followers` source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u64>,

    /// Points per unit (penalties: points deducted per unit)
    pub weight: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Rules whose triggers must all have matched. Penalties may not
    /// require signals.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    /// Rules whose triggers must not have matched. A signal may only be
    /// switched off by an ungrouped, unconditional signal worth at least as
    /// much.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless: Vec<String>,
}

impl SignalRule {
    /// Keyword rule searching `surface`
    pub fn matching(name: &str, surface: Surface, weight: f64, keywords: &[&str]) -> Self {
        Self {
            keywords: to_strings(keywords),
            surface,
            ..Self::from_source(name, Source::Keywords, weight)
        }
    }

    /// Rule driven by a non-keyword source
    pub fn from_source(name: &str, source: Source, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            source,
            keywords: Vec::new(),
            surface: Surface::default(),
            companies: Vec::new(),
            threshold: None,
            weight,
            cap: None,
            group: None,
            requires: Vec::new(),
            unless: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.keywords = to_strings(keywords);
        self
    }

    pub fn with_companies(mut self, companies: &[&str]) -> Self {
        self.companies = to_strings(companies);
        self
    }

    pub fn on(mut self, surface: Surface) -> Self {
        self.surface = surface;
        self
    }

    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_cap(mut self, cap: u32) -> Self {
        self.cap = Some(cap);
        self
    }

    pub fn in_group(mut self, group: &str) -> Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn requires(mut self, names: &[&str]) -> Self {
        self.requires = to_strings(names);
        self
    }

    pub fn unless(mut self, names: &[&str]) -> Self {
        self.unless = to_strings(names);
        self
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_scale_max() -> f64 {
    100.0
}

/// The current calendar year and the one before it
pub fn default_recent_years() -> Vec<i32> {
    let year = chrono::Utc::now().year();
    vec![year - 1, year]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_set_is_stealth_preset() {
        let rules = RuleSet::default();
        assert_eq!(rules.scale_max, 100.0);
        assert_eq!(rules.tiers, TierThresholds { a: 0.75, b: 0.60 });
        assert!(rules.rule("stealth").is_some());
        assert_eq!(rules.recent_years.len(), 2);
    }

    #[test]
    fn test_tier_thresholds_scale() {
        let rules = RuleSet {
            scale_max: 10.0,
            ..RuleSet::default()
        };
        assert_eq!(rules.tier_a_threshold(), 7.5);
        assert_eq!(rules.tier_b_threshold(), 6.0);
    }

    #[test]
    fn test_default_recent_years_are_consecutive() {
        let years = default_recent_years();
        assert_eq!(years[1] - years[0], 1);
    }

    #[test]
    fn test_minimal_rule_set_parse() {
        let yaml = r#"
signals:
  - name: stealth
    keywords: ["stealth"]
    weight: 20
"#;
        let rules: RuleSet = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(rules.scale_max, 100.0);
        assert_eq!(rules.tiers, TierThresholds::default());
        assert_eq!(rules.match_mode, MatchMode::Substring);
        assert_eq!(rules.signals.len(), 1);
        assert_eq!(rules.signals[0].source, Source::Keywords);
        assert_eq!(rules.signals[0].surface, Surface::Full);
        assert!(rules.signals[0].cap.is_none());
        assert!(rules.penalties.is_empty());
        assert_eq!(rules.categories, CategorySignals::default());
    }

    #[test]
    fn test_full_rule_parse() {
        let yaml = r#"
scale_max: 10
tiers: { a: 0.8, b: 0.5 }
recent_years: [2023, 2024]
match_mode: word
groups:
  - { name: industry, max_points: 3 }
categories: { health: med, ai: null, consumer: shop }
signals:
  - name: med
    keywords: ["clinical"]
    surface: experience
    weight: 2
    cap: 2
    group: industry
penalties:
  - name: famous
    source: followers
    threshold: 50000
    weight: 1
    unless: [med]
"#;
        let rules: RuleSet = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(rules.scale_max, 10.0);
        assert_eq!(rules.recent_years, vec![2023, 2024]);
        assert_eq!(rules.match_mode, MatchMode::Word);
        assert_eq!(rules.group_cap("industry"), Some(3.0));
        assert_eq!(rules.categories.ai, None);
        assert_eq!(rules.categories.health.as_deref(), Some("med"));

        let med = &rules.signals[0];
        assert_eq!(med.surface, Surface::Experience);
        assert_eq!(med.cap, Some(2));
        assert_eq!(med.group.as_deref(), Some("industry"));

        let famous = &rules.penalties[0];
        assert_eq!(famous.source, Source::Followers);
        assert_eq!(famous.threshold, Some(50_000));
        assert_eq!(famous.unless, vec!["med"]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
signals:
  - name: stealth
    keywords: ["stealth"]
    weight: 20
    bonus: 3
"#;
        assert!(serde_saphyr::from_str::<RuleSet>(yaml).is_err());
    }

    #[test]
    fn test_rule_set_serde_roundtrip() {
        let rules = RuleSet::default().with_recent_years(&[2023, 2024]);
        let yaml = serde_saphyr::to_string(&rules).unwrap();
        let parsed: RuleSet = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(rules, parsed);
    }

    #[test]
    fn test_builder_helpers() {
        let rule = SignalRule::matching("top_school", Surface::Schools, 2.0, &["stanford"])
            .with_cap(3)
            .in_group("background")
            .unless(&["stealth"]);
        assert_eq!(rule.source, Source::Keywords);
        assert_eq!(rule.keywords, vec!["stanford"]);
        assert_eq!(rule.cap, Some(3));
        assert_eq!(rule.group.as_deref(), Some("background"));
        assert_eq!(rule.unless, vec!["stealth"]);
    }
}
