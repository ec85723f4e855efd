//! Typing judgment for a kana rhythm game: keystrokes and playback time in, verdicts and score out.

pub mod chart;
pub mod config;
pub mod error;
pub mod gameplay;
pub mod input;
pub mod romaji;
pub mod session;
pub mod time;

pub use chart::{Chart, Grade, HitState, NoteState};
pub use config::SessionConfig;
pub use error::JudgeError;
pub use gameplay::judge::{JudgeMachine, KeystrokeOutcome, TickOutcome};
pub use gameplay::score::Score;
pub use gameplay::{Outcome, Verdict};
pub use session::{Feedback, Session};
