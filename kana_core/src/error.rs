use kana_schema::Millis;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum JudgeError {
    #[error("session is already complete")]
    InvalidSessionState,

    #[error("note {note} has no typeable romanization; it can only be missed")]
    EmptyCandidateSet { note: usize },

    #[error("time went backwards: {got}ms after {last}ms")]
    NonMonotonicTime { last: Millis, got: Millis },
}
