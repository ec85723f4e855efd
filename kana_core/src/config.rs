use kana_schema::{Difficulty, DEFAULT_STRICTNESS};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::gameplay::timing::is_valid_strictness;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Overrides the beatmap's strictness when set.
    pub strictness: Option<f64>,
    /// Applied to every point award; the product of the active modifiers' multipliers.
    pub score_multiplier: f64,
    pub record_replay: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            strictness: None,
            score_multiplier: 1.0,
            record_replay: true,
        }
    }
}

impl SessionConfig {
    pub fn with_strictness(mut self, strictness: f64) -> Self {
        self.strictness = Some(strictness);
        self
    }

    pub fn with_modifiers<I>(mut self, multipliers: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.score_multiplier = aggregate_score_multiplier(multipliers);
        self
    }

    pub fn resolve_strictness(&self, difficulty: &Difficulty) -> f64 {
        let strictness = self.strictness.unwrap_or(difficulty.strictness);
        if is_valid_strictness(strictness) {
            strictness
        } else {
            warn!("invalid strictness {strictness}; using {DEFAULT_STRICTNESS}");
            DEFAULT_STRICTNESS
        }
    }
}

pub fn aggregate_score_multiplier<I>(multipliers: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    multipliers.into_iter().fold(1.0, |acc, m| acc * m)
}
