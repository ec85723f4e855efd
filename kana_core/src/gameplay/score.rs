use log::warn;
use serde::{Deserialize, Serialize};

use crate::chart::Grade;
use crate::gameplay::{Outcome, Verdict};

pub const SCORE_EXCELLENT: u64 = 1500;
pub const SCORE_GOOD: u64 = 1000;
pub const SCORE_FAIR: u64 = 500;
pub const SCORE_POOR: u64 = 0;

pub const SCORE_COMBO: u64 = 10;
pub const SCORE_COMBO_MAX: u64 = 1000;

pub fn base_points(grade: Grade) -> u64 {
    match grade {
        Grade::Excellent => SCORE_EXCELLENT,
        Grade::Good => SCORE_GOOD,
        Grade::Fair => SCORE_FAIR,
        Grade::Poor => SCORE_POOR,
    }
}

/// Contribution of one resolved note to accuracy, relative to an excellent.
pub fn accuracy_weight(outcome: Outcome) -> f64 {
    match outcome {
        Outcome::Hit(grade) => base_points(grade) as f64 / SCORE_EXCELLENT as f64,
        Outcome::Miss => 0.0,
    }
}

pub fn combo_bonus(combo: u32) -> u64 {
    (SCORE_COMBO * combo as u64).min(SCORE_COMBO_MAX)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub total_points: u64,
    pub current_combo: u32,
    pub max_combo: u32,
    pub excellent: u32,
    pub good: u32,
    pub fair: u32,
    pub poor: u32,
    pub miss: u32,
    pub accuracy: f64,
    pub mean_hit_error_ms: Option<f64>,
}

impl Default for Score {
    fn default() -> Self {
        Self {
            total_points: 0,
            current_combo: 0,
            max_combo: 0,
            excellent: 0,
            good: 0,
            fair: 0,
            poor: 0,
            miss: 0,
            accuracy: 1.0,
            mean_hit_error_ms: None,
        }
    }
}

impl Score {
    pub fn resolved(&self) -> u32 {
        self.excellent + self.good + self.fair + self.poor + self.miss
    }
}

#[derive(Debug, Clone)]
pub struct ScoreAccumulator {
    score: Score,
    multiplier: f64,
    weighted_hits: f64,
    hit_error_sum: f64,
    hit_error_count: u32,
}

impl Default for ScoreAccumulator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl ScoreAccumulator {
    /// A negative or non-finite multiplier falls back to 1.0.
    pub fn new(multiplier: f64) -> Self {
        let multiplier = if multiplier.is_finite() && multiplier >= 0.0 {
            multiplier
        } else {
            warn!("invalid score multiplier {multiplier}; using 1.0");
            1.0
        };
        Self {
            score: Score::default(),
            multiplier,
            weighted_hits: 0.0,
            hit_error_sum: 0.0,
            hit_error_count: 0,
        }
    }

    pub fn snapshot(&self) -> Score {
        self.score.clone()
    }

    pub fn apply(&mut self, verdict: &Verdict) {
        match verdict.outcome {
            Outcome::Hit(grade) => self.on_hit(grade, verdict.delta_ms),
            Outcome::Miss => self.on_miss(),
        }

        self.weighted_hits += accuracy_weight(verdict.outcome);
        let resolved = self.score.resolved();
        self.score.accuracy = if resolved == 0 {
            1.0
        } else {
            (self.weighted_hits / resolved as f64).clamp(0.0, 1.0)
        };
    }

    fn on_hit(&mut self, grade: Grade, delta_ms: Option<f64>) {
        let s = &mut self.score;
        let raw = base_points(grade) + combo_bonus(s.current_combo);
        let awarded = (raw as f64 * self.multiplier).round() as u64;
        s.total_points = s.total_points.saturating_add(awarded);

        // A poor still scores but breaks the combo.
        if grade == Grade::Poor {
            s.current_combo = 0;
        } else {
            s.current_combo += 1;
        }
        s.max_combo = s.max_combo.max(s.current_combo);

        match grade {
            Grade::Excellent => s.excellent += 1,
            Grade::Good => s.good += 1,
            Grade::Fair => s.fair += 1,
            Grade::Poor => s.poor += 1,
        }

        if let Some(delta) = delta_ms.filter(|d| d.is_finite()) {
            self.hit_error_sum += delta;
            self.hit_error_count += 1;
            s.mean_hit_error_ms = Some(self.hit_error_sum / self.hit_error_count as f64);
        }
    }

    fn on_miss(&mut self) {
        let s = &mut self.score;
        s.max_combo = s.max_combo.max(s.current_combo);
        s.current_combo = 0;
        s.miss += 1;
    }
}
