use kana_schema::{Millis, DEFAULT_STRICTNESS};

use crate::chart::Grade;

pub const BASE_EXCELLENT_MS: Millis = 20.0;
pub const BASE_GOOD_MS: Millis = 50.0;
pub const BASE_FAIR_MS: Millis = 100.0;
pub const BASE_POOR_MS: Millis = 200.0;

/// Half-width timing windows in milliseconds, tightest first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingWindows {
    pub excellent: Millis,
    pub good: Millis,
    pub fair: Millis,
    pub poor: Millis,
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self::from_strictness(DEFAULT_STRICTNESS)
    }
}

impl TimingWindows {
    /// Larger strictness narrows every window. Unusable values fall back to the default.
    pub fn from_strictness(strictness: f64) -> Self {
        let strictness = if is_valid_strictness(strictness) {
            strictness
        } else {
            DEFAULT_STRICTNESS
        };
        let scale = strictness / 5.0;
        Self {
            excellent: BASE_EXCELLENT_MS / scale,
            good: BASE_GOOD_MS / scale,
            fair: BASE_FAIR_MS / scale,
            poor: BASE_POOR_MS / scale,
        }
    }

    /// `None` means the delta is outside every window, i.e. a miss.
    pub fn classify(&self, delta_ms: Millis) -> Option<Grade> {
        let delta = delta_ms.abs();
        if delta <= self.excellent {
            Some(Grade::Excellent)
        } else if delta <= self.good {
            Some(Grade::Good)
        } else if delta <= self.fair {
            Some(Grade::Fair)
        } else if delta <= self.poor {
            Some(Grade::Poor)
        } else {
            None
        }
    }
}

pub fn classify(delta_ms: Millis, strictness: f64) -> Option<Grade> {
    TimingWindows::from_strictness(strictness).classify(delta_ms)
}

pub fn is_valid_strictness(strictness: f64) -> bool {
    strictness.is_finite() && strictness > 0.0
}
