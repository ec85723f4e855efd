use kana_schema::Millis;
use log::warn;

use crate::error::JudgeError;

/// Last song time seen by a session. Times handed to the engine must never go backwards.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    last: Option<Millis>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Millis> {
        self.last
    }

    /// Accepts `time` only if it does not precede the last observed time.
    pub fn observe(&mut self, time: Millis) -> Result<Millis, JudgeError> {
        match self.last {
            Some(last) if time.is_nan() || time < last => {
                Err(JudgeError::NonMonotonicTime { last, got: time })
            }
            None if time.is_nan() => Err(JudgeError::NonMonotonicTime {
                last: 0.0,
                got: time,
            }),
            _ => {
                self.last = Some(time);
                Ok(time)
            }
        }
    }

    /// Like [`observe`](Self::observe) but pins a backwards time to the last one seen.
    pub fn clamp(&mut self, time: Millis) -> Millis {
        match self.observe(time) {
            Ok(time) => time,
            Err(err) => {
                warn!("{err}; clamping");
                self.last.unwrap_or(0.0)
            }
        }
    }
}
