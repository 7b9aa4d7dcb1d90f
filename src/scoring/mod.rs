pub mod config;
pub mod engine;
pub mod factors;
pub mod presets;
pub mod validation;

pub use config::*;
pub use engine::{score, score_all, Category, ScoreResult, SignalContribution, Tier};
pub use factors::{MatchMode, Source, Surface};
pub use presets::Preset;
pub use validation::validate_rules;
