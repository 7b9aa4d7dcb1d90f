use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::{Preset, RuleSet};

/// Contents of `config.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Built-in rule set to start from (default: stealth)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,

    /// Full rule set; replaces the preset entirely when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RuleSet>,

    /// Profile JSON files scored when no `--input` is given
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<PathBuf>,

    /// Report directory used when no `--out-dir` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Resolve the rule set to score with.
    ///
    /// A preset chosen on the command line wins, then explicit `rules`, then
    /// the configured `preset`, then the default preset.
    pub fn effective_rules(&self, preset_override: Option<Preset>) -> RuleSet {
        if let Some(preset) = preset_override {
            return preset.rules();
        }
        match (&self.rules, self.preset) {
            (Some(rules), _) => rules.clone(),
            (None, Some(preset)) => preset.rules(),
            (None, None) => Preset::default().rules(),
        }
    }
}
