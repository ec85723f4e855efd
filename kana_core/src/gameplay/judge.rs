use kana_schema::Millis;
use log::{debug, info};

use crate::chart::{Chart, HitState};
use crate::gameplay::timing::TimingWindows;
use crate::gameplay::{Outcome, Verdict};
use crate::input::events::KeyEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum KeystrokeOutcome {
    /// Control character, or nothing left to type.
    Ignored,
    /// The character matched neither the active note nor the lookahead note.
    Rejected { character: char },
    Accepted {
        character: char,
        note: usize,
        completed: bool,
        /// A lookahead miss (if any) followed by the hit (if the note completed).
        verdicts: Vec<Verdict>,
        /// Set exactly once per session, when this keystroke resolved the last note.
        session_completed: bool,
    },
}

impl KeystrokeOutcome {
    pub fn verdicts(&self) -> &[Verdict] {
        match self {
            KeystrokeOutcome::Accepted { verdicts, .. } => verdicts,
            _ => &[],
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, KeystrokeOutcome::Accepted { .. })
    }

    pub fn session_completed(&self) -> bool {
        matches!(
            self,
            KeystrokeOutcome::Accepted {
                session_completed: true,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub verdicts: Vec<Verdict>,
    /// Set exactly once per session, on the call that moved the cursor past the last note.
    pub session_completed: bool,
}

#[derive(Debug, Clone)]
pub struct JudgeMachine {
    /// Index of the earliest note still `NotHit`.
    cursor: usize,
    pub windows: TimingWindows,
    completion_signaled: bool,
}

impl Default for JudgeMachine {
    fn default() -> Self {
        Self::new(TimingWindows::default())
    }
}

impl JudgeMachine {
    pub fn new(windows: TimingWindows) -> Self {
        Self {
            cursor: 0,
            windows,
            completion_signaled: false,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_complete(&self, chart: &Chart) -> bool {
        self.cursor >= chart.len()
    }

    pub fn process_input(&mut self, event: KeyEvent, chart: &mut Chart) -> KeystrokeOutcome {
        let KeyEvent { character, time } = event;

        if character.is_control() {
            return KeystrokeOutcome::Ignored;
        }
        if chart.all_resolved() {
            return KeystrokeOutcome::Ignored;
        }

        let active = self.cursor;
        let Some(note) = chart.note(active) else {
            return KeystrokeOutcome::Ignored;
        };
        if note.is_resolved() {
            return KeystrokeOutcome::Ignored;
        }

        let mut verdicts = Vec::new();

        // Only the active note and the one right after it are ever candidates.
        let target = if note.accepts(character) {
            active
        } else if self.lookahead_accepts(chart, active, time, character) {
            verdicts.extend(self.resolve(chart, active, Outcome::Miss, time, None));
            self.cursor = active + 1;
            active + 1
        } else {
            debug!("'{character}' rejected at {time}ms (note {active})");
            return KeystrokeOutcome::Rejected { character };
        };

        let Some(note) = chart.note_mut(target) else {
            return KeystrokeOutcome::Rejected { character };
        };
        let consumed = note.consume(character);
        let target_time = note.time;

        if consumed.completed {
            let delta = time - target_time;
            // Completing a note outside every window still resolves it, as a miss.
            let outcome = match self.windows.classify(delta) {
                Some(grade) => Outcome::Hit(grade),
                None => Outcome::Miss,
            };
            verdicts.extend(self.resolve(chart, target, outcome, time, Some(delta)));
            self.advance_cursor(chart);
        }

        KeystrokeOutcome::Accepted {
            character,
            note: target,
            completed: consumed.completed,
            verdicts,
            session_completed: self.take_completion(chart),
        }
    }

    /// Misses the active note while a later note is already due or a typing cutoff has passed it.
    pub fn check_misses(&mut self, current_time: Millis, chart: &mut Chart) -> Vec<Verdict> {
        let mut results = Vec::new();

        loop {
            self.advance_cursor(chart);
            let Some(active) = chart.note(self.cursor) else {
                break;
            };

            let next_due = chart
                .note(self.cursor + 1)
                .is_some_and(|next| next.time <= current_time);
            let cut_off = chart
                .cutoffs()
                .iter()
                .any(|&cutoff| cutoff <= current_time && cutoff > active.time);

            if !(next_due || cut_off) {
                break;
            }

            let idx = self.cursor;
            results.extend(self.resolve(chart, idx, Outcome::Miss, current_time, None));
        }

        results
    }

    /// Misses every note still unresolved; used when the song ends.
    pub fn finish(&mut self, current_time: Millis, chart: &mut Chart) -> Vec<Verdict> {
        let mut results = Vec::new();
        for idx in self.cursor..chart.len() {
            results.extend(self.resolve(chart, idx, Outcome::Miss, current_time, None));
        }
        self.cursor = chart.len();
        results
    }

    /// Reports session completion the first time the cursor is found past the last note.
    pub fn take_completion(&mut self, chart: &Chart) -> bool {
        if self.completion_signaled || !self.is_complete(chart) {
            return false;
        }
        self.completion_signaled = true;
        info!("all {} notes resolved", chart.len());
        true
    }

    fn lookahead_accepts(&self, chart: &Chart, active: usize, time: Millis, c: char) -> bool {
        let (Some(current), Some(next)) = (chart.note(active), chart.note(active + 1)) else {
            return false;
        };
        time > current.time && next.accepts(c)
    }

    fn resolve(
        &self,
        chart: &mut Chart,
        idx: usize,
        outcome: Outcome,
        time: Millis,
        delta_ms: Option<Millis>,
    ) -> Option<Verdict> {
        let note = chart.note_mut(idx)?;
        if !note.resolve(outcome.hit_state()) {
            return None;
        }
        debug!("note {idx} -> {outcome:?} at {time}ms (delta {delta_ms:?})");
        Some(Verdict {
            note: idx,
            outcome,
            time,
            delta_ms,
        })
    }

    fn advance_cursor(&mut self, chart: &Chart) {
        while chart
            .note(self.cursor)
            .is_some_and(|note| note.hit_state() != HitState::NotHit)
        {
            self.cursor += 1;
        }
    }
}
