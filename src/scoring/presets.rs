use serde::{Deserialize, Serialize};
use std::fmt;

use super::config::{default_recent_years, CategorySignals, GroupCap, RuleSet, SignalRule, TierThresholds};
use super::factors::{MatchMode, Source, Surface};

/// Built-in rule sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Early-stage stealth founders, 100-point scale
    #[default]
    Stealth,
    /// Indian-origin stealth founders with a metro-city bias, 100-point scale
    IndianFounders,
    /// Accelerator-style sourcing, 10-point scale with countable signals
    Antler,
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Stealth => "stealth",
            Preset::IndianFounders => "indian-founders",
            Preset::Antler => "antler",
        }
    }

    pub fn rules(&self) -> RuleSet {
        match self {
            Preset::Stealth => stealth(),
            Preset::IndianFounders => indian_founders(),
            Preset::Antler => antler(),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const STEALTH_PHRASES: &[&str] = &[
    "stealth",
    "building",
    "working on",
    "exploring",
    "incubating",
    "pre-seed",
    "early stage",
];

const FOUNDER_TITLES: &[&str] = &["founder", "co-founder", "cofounder", "co founder", "entrepreneur"];

const TOP_COMPANIES: &[&str] = &[
    "google",
    "alphabet",
    "meta",
    "facebook",
    "amazon",
    "microsoft",
    "apple",
    "netflix",
    "stripe",
    "airbnb",
    "uber",
    "openai",
    "mckinsey",
    "flipkart",
];

const TOP_SCHOOLS: &[&str] = &[
    "stanford",
    "harvard",
    " mit ",
    "massachusetts institute of technology",
    "berkeley",
    "carnegie mellon",
    "oxford",
    "cambridge",
    "wharton",
    " iit ",
    "indian institute of technology",
    " iim ",
    "indian institute of management",
    "bits pilani",
];

const AI_TERMS: &[&str] = &[
    " ai ",
    "genai",
    "artificial intelligence",
    "machine learning",
    " ml ",
    "deep learning",
    "nlp",
    " llm",
    "computer vision",
    "mlops",
];

const HEALTH_TERMS: &[&str] = &[
    "healthtech",
    "health tech",
    "healthcare",
    "digital health",
    "medtech",
    "biotech",
    "medical",
    "clinical",
    "wellness",
    "pharma",
];

const CONSUMER_TERMS: &[&str] = &[
    "consumer",
    "d2c",
    "b2c",
    "direct to consumer",
    "e-commerce",
    "ecommerce",
    "marketplace",
    "edtech",
    "foodtech",
    "gaming",
    "social app",
];

const FINTECH_TERMS: &[&str] = &["fintech", "payments", "lending", "neobank", "insurtech", "crypto", "defi"];

const EXEC_TITLES: &[&str] = &[
    " ceo ",
    " cfo ",
    " coo ",
    " cto ",
    " chief ",
    " vp ",
    "vice president",
    "director",
    "head of",
];

const SENIOR_PHRASES: &[&str] = &[
    "senior",
    "veteran",
    "executive",
    " vp ",
    "vice president",
    "director",
    "head of",
    "chief",
    "10+ years",
    "15+ years",
    "20+ years",
    "thought leader",
    "influencer",
    "keynote speaker",
];

const ACCELERATORS: &[&str] = &[
    " yc ",
    "y combinator",
    "techstars",
    "500 startups",
    "antler",
    "entrepreneur first",
    "on deck",
    "accelerator",
    "cohort",
];

const OUTREACH_PHRASES: &[&str] = &["hiring", "open to", "seeking", "looking for", "let's connect", "building"];

fn stealth() -> RuleSet {
    RuleSet {
        scale_max: 100.0,
        tiers: TierThresholds::default(),
        recent_years: default_recent_years(),
        match_mode: MatchMode::Substring,
        groups: vec![GroupCap {
            name: "industry".to_string(),
            max_points: 15.0,
        }],
        categories: CategorySignals::default(),
        signals: vec![
            SignalRule::matching("stealth", Surface::Headline, 20.0, STEALTH_PHRASES),
            SignalRule::matching("founder_title", Surface::Titles, 10.0, FOUNDER_TITLES),
            SignalRule::from_source("recent_role", Source::RecentStart, 12.0),
            SignalRule::from_source("recent_mention", Source::RecentMention, 10.0)
                .with_keywords(&["recently", "just launched", "just started", "new chapter"])
                .on(Surface::Headline),
            SignalRule::matching("building_without_role", Surface::Headline, 8.0, &["building", "stealth"])
                .unless(&["recent_role"]),
            SignalRule::from_source("recent_exit", Source::RecentEnd, 8.0),
            SignalRule::matching("top_company", Surface::Full, 12.0, TOP_COMPANIES),
            SignalRule::matching("top_school", Surface::Full, 10.0, TOP_SCHOOLS),
            SignalRule::matching("ai", Surface::Full, 7.0, AI_TERMS).in_group("industry"),
            SignalRule::matching("fintech", Surface::Full, 5.0, FINTECH_TERMS).in_group("industry"),
            SignalRule::matching("health", Surface::Full, 5.0, HEALTH_TERMS).in_group("industry"),
            SignalRule::matching("consumer", Surface::Full, 5.0, CONSUMER_TERMS).in_group("industry"),
            SignalRule::matching(
                "geography",
                Surface::Full,
                10.0,
                &[
                    "san francisco",
                    "bay area",
                    "new york",
                    "london",
                    "singapore",
                    "bangalore",
                    "bengaluru",
                    "mumbai",
                    "delhi",
                    "berlin",
                    "paris",
                    "toronto",
                ],
            ),
            SignalRule::matching("accelerator", Surface::Full, 10.0, ACCELERATORS),
            SignalRule::from_source("email", Source::Email, 6.0),
            SignalRule::matching("outreach", Surface::Headline, 5.0, OUTREACH_PHRASES),
        ],
        penalties: vec![
            SignalRule::from_source("bigco_executive", Source::RoleAt, 10.0)
                .with_keywords(EXEC_TITLES)
                .with_companies(TOP_COMPANIES)
                .unless(&["stealth"]),
            SignalRule::from_source("large_following", Source::Followers, 5.0)
                .with_threshold(50_000)
                .unless(&["stealth"]),
            SignalRule::from_source("no_founder_signal", Source::Always, 5.0)
                .unless(&["founder_title", "recent_role", "stealth"]),
            SignalRule::matching("senior_title", Surface::Headline, 5.0, SENIOR_PHRASES)
                .with_cap(4)
                .unless(&["stealth"]),
        ],
    }
}

const INDIAN_MARKERS: &[&str] = &[
    "india",
    "indian",
    " iit ",
    "indian institute of technology",
    " iim ",
    "bits pilani",
    " nit ",
    "delhi university",
    "mumbai university",
    "anna university",
    " vit ",
    "manipal",
];

const METRO_CITIES: &[&str] = &[
    "bangalore",
    "bengaluru",
    "mumbai",
    "delhi",
    "new delhi",
    "gurgaon",
    "gurugram",
    "noida",
    "hyderabad",
    "pune",
    "chennai",
];

const OTHER_CITIES: &[&str] = &[
    "kolkata",
    "ahmedabad",
    "jaipur",
    "chandigarh",
    "kochi",
    "indore",
    "coimbatore",
    "san francisco",
    "bay area",
    "new york",
    "london",
    "singapore",
    "dubai",
];

const NETWORK_TERMS: &[&str] = &[
    "angel investor",
    "advisor",
    "mentor",
    "y combinator",
    " yc ",
    "techstars",
    "antler",
    "sequoia surge",
    "venture partner",
];

fn indian_founders() -> RuleSet {
    RuleSet {
        scale_max: 100.0,
        tiers: TierThresholds::default(),
        recent_years: default_recent_years(),
        match_mode: MatchMode::Substring,
        groups: vec![
            GroupCap {
                name: "focus".to_string(),
                max_points: 15.0,
            },
            GroupCap {
                name: "background".to_string(),
                max_points: 10.0,
            },
            GroupCap {
                name: "network".to_string(),
                max_points: 5.0,
            },
        ],
        categories: CategorySignals::default(),
        signals: vec![
            SignalRule::matching(
                "stealth_phrase",
                Surface::Headline,
                0.0,
                &[
                    "stealth",
                    "building something",
                    "working on something",
                    "exploring",
                    "next chapter",
                    "day 0",
                    "day zero",
                ],
            ),
            SignalRule::matching("founder_phrase", Surface::Full, 0.0, FOUNDER_TITLES),
            SignalRule::from_source("stealth_founder", Source::Always, 30.0)
                .requires(&["stealth_phrase", "founder_phrase"]),
            SignalRule::from_source("recency", Source::RecentMention, 20.0)
                .with_keywords(&["recently", "just started", "new venture"])
                .on(Surface::Full),
            SignalRule::matching("indian_background", Surface::Full, 15.0, INDIAN_MARKERS),
            SignalRule::matching("health", Surface::Full, 8.0, HEALTH_TERMS).in_group("focus"),
            SignalRule::matching("consumer", Surface::Full, 8.0, CONSUMER_TERMS).in_group("focus"),
            SignalRule::matching("ai", Surface::Full, 4.0, AI_TERMS).in_group("focus"),
            SignalRule::matching("top_company", Surface::Companies, 2.0, TOP_COMPANIES)
                .with_cap(5)
                .in_group("background"),
            SignalRule::matching("top_school", Surface::Schools, 2.0, TOP_SCHOOLS)
                .with_cap(3)
                .in_group("background"),
            SignalRule::matching("metro_city", Surface::Location, 5.0, METRO_CITIES),
            SignalRule::matching("other_city", Surface::Location, 3.0, OTHER_CITIES)
                .unless(&["metro_city"]),
            SignalRule::matching("network", Surface::Full, 2.0, NETWORK_TERMS)
                .with_cap(3)
                .in_group("network"),
            SignalRule::matching("outreach", Surface::Headline, 5.0, OUTREACH_PHRASES),
        ],
        penalties: vec![SignalRule::matching("senior_title", Surface::Headline, 5.0, SENIOR_PHRASES)
            .with_cap(4)
            .unless(&["stealth_phrase"])],
    }
}

fn antler() -> RuleSet {
    RuleSet {
        scale_max: 10.0,
        tiers: TierThresholds::default(),
        recent_years: default_recent_years(),
        match_mode: MatchMode::Substring,
        groups: Vec::new(),
        categories: CategorySignals::default(),
        signals: vec![
            SignalRule::matching(
                "stealth",
                Surface::Full,
                0.5,
                &[
                    "stealth",
                    "building something",
                    "working on something new",
                    "exploring opportunities",
                    "next chapter",
                    "starting something new",
                    "early stage",
                    "early-stage",
                    "pre-seed",
                    "between opportunities",
                ],
            )
            .with_cap(8),
            SignalRule::from_source("recent", Source::RecentMention, 0.4)
                .with_keywords(&[
                    "recently graduated",
                    "just graduated",
                    "recently joined",
                    "new role",
                    "recent transition",
                ])
                .on(Surface::Full)
                .with_cap(5),
            SignalRule::matching(
                "background",
                Surface::Full,
                0.15,
                &[
                    "stanford",
                    "harvard",
                    " mit ",
                    "berkeley",
                    "carnegie mellon",
                    "google",
                    "meta",
                    "amazon",
                    "microsoft",
                    "apple",
                    "mckinsey",
                    " phd",
                    "software engineer",
                    "data scientist",
                    "product manager",
                ],
            )
            .with_cap(10),
            SignalRule::matching(
                "industry",
                Surface::Full,
                0.15,
                &[
                    " ai ",
                    "machine learning",
                    "fintech",
                    "payments",
                    "healthtech",
                    "healthcare",
                    "biotech",
                    "edtech",
                    "e-commerce",
                    "marketplace",
                    "proptech",
                    "climate",
                    "web3",
                    "saas",
                ],
            )
            .with_cap(10),
            SignalRule::matching(
                "geography",
                Surface::Location,
                0.1,
                &["san francisco", "new york", "london", "singapore", "bangalore", "berlin", "sydney"],
            )
            .with_cap(5),
            SignalRule::matching(
                "network",
                Surface::Full,
                0.1,
                &["y combinator", " yc ", "techstars", "antler", "angel investor", "venture capital", "incubator", "accelerator"],
            )
            .with_cap(5),
            SignalRule::matching(
                "conversation",
                Surface::Headline,
                0.075,
                &["building", "exploring", "working on", "starting", "opportunity", "solving", "passionate", "curious"],
            )
            .with_cap(10),
            SignalRule::matching("ai", Surface::Full, 0.0, AI_TERMS),
            SignalRule::matching("health", Surface::Full, 0.0, HEALTH_TERMS),
            SignalRule::matching("consumer", Surface::Full, 0.0, CONSUMER_TERMS),
        ],
        penalties: Vec::new(),
    }
}
