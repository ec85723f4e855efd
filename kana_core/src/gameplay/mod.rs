pub mod judge;
pub mod progress;
pub mod score;
pub mod timing;

use kana_schema::Millis;
use serde::Serialize;

use crate::chart::{Grade, HitState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Hit(Grade),
    Miss,
}

impl Outcome {
    pub fn hit_state(self) -> HitState {
        match self {
            Outcome::Hit(grade) => HitState::Hit(grade),
            Outcome::Miss => HitState::Missed,
        }
    }
}

/// The resolution of one note.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub note: usize,
    pub outcome: Outcome,
    /// Time at which the note was resolved.
    pub time: Millis,
    /// Signed `typed_time - target_time` when a keystroke resolved the note.
    pub delta_ms: Option<Millis>,
}
