use kana_schema::{Beatmap, EventKind, Millis, Syllable};
use log::warn;
use serde::Serialize;

use crate::error::JudgeError;
use crate::gameplay::progress::{Consume, NoteProgress};
use crate::romaji;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum HitState {
    #[default]
    NotHit,
    Hit(Grade),
    Missed,
}

impl HitState {
    pub fn is_resolved(self) -> bool {
        self != HitState::NotHit
    }
}

/// A note as played in one session: the beatmap data plus mutable typing state.
#[derive(Debug, Clone)]
pub struct NoteState {
    pub id: usize,
    pub time: Millis,
    pub text: String,
    pub syllables: Vec<Syllable>,
    progress: NoteProgress,
    hit: HitState,
}

impl NoteState {
    pub fn hit_state(&self) -> HitState {
        self.hit
    }

    pub fn is_resolved(&self) -> bool {
        self.hit.is_resolved()
    }

    pub fn typed_prefix(&self) -> &str {
        self.progress.typed_prefix()
    }

    pub fn candidate_paths(&self) -> Vec<&str> {
        self.progress.candidate_paths(&self.syllables)
    }

    pub fn remaining_romaji(&self) -> String {
        self.progress.remaining_romaji(&self.syllables)
    }

    /// Shortest full romanization of the note, or `None` if some syllable is untypeable.
    pub fn shortest_path(&self) -> Option<String> {
        self.syllables
            .iter()
            .map(|s| s.romaji.iter().min_by_key(|path| path.len()).cloned())
            .collect()
    }

    /// Preferred full romanization: the first candidate of every syllable.
    pub fn preferred_path(&self) -> Option<String> {
        self.syllables
            .iter()
            .map(|s| s.romaji.first().cloned())
            .collect()
    }

    pub fn is_typeable(&self) -> bool {
        !self.syllables.is_empty() && self.syllables.iter().all(|s| !s.romaji.is_empty())
    }

    pub(crate) fn accepts(&self, c: char) -> bool {
        !self.hit.is_resolved() && self.progress.accepts(&self.syllables, c)
    }

    pub(crate) fn consume(&mut self, c: char) -> Consume {
        if self.hit.is_resolved() {
            return Consume::default();
        }
        self.progress.try_consume(&self.syllables, c)
    }

    /// Moves out of `NotHit`. Terminal states never change again.
    pub(crate) fn resolve(&mut self, state: HitState) -> bool {
        if self.hit.is_resolved() || !state.is_resolved() {
            return false;
        }
        self.hit = state;
        true
    }
}

/// The session-owned arena of notes plus the times of typing cutoffs.
#[derive(Debug, Clone, Default)]
pub struct Chart {
    notes: Vec<NoteState>,
    cutoffs: Vec<Millis>,
}

impl Chart {
    /// Clones the beatmap's notes and events; the beatmap itself is never touched again.
    pub fn from_beatmap(map: &Beatmap) -> Self {
        let notes: Vec<NoteState> = map
            .notes
            .iter()
            .enumerate()
            .map(|(id, note)| NoteState {
                id,
                time: note.time,
                text: note.text.clone(),
                syllables: romaji::resolve_note(note),
                progress: NoteProgress::new(),
                hit: HitState::NotHit,
            })
            .collect();

        for note in notes.iter().filter(|n| !n.is_typeable()) {
            warn!("{}", JudgeError::EmptyCandidateSet { note: note.id });
        }
        if notes.windows(2).any(|w| w[1].time < w[0].time) {
            warn!("beatmap {} has notes out of time order", map.meta.id);
        }

        let mut cutoffs: Vec<Millis> = map
            .events
            .iter()
            .filter(|e| e.kind == EventKind::TypingCutoff)
            .map(|e| e.start)
            .collect();
        cutoffs.sort_by(|a, b| a.total_cmp(b));

        Self { notes, cutoffs }
    }

    pub fn notes(&self) -> &[NoteState] {
        &self.notes
    }

    pub fn note(&self, id: usize) -> Option<&NoteState> {
        self.notes.get(id)
    }

    pub(crate) fn note_mut(&mut self, id: usize) -> Option<&mut NoteState> {
        self.notes.get_mut(id)
    }

    pub fn cutoffs(&self) -> &[Millis] {
        &self.cutoffs
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn all_resolved(&self) -> bool {
        self.notes.iter().all(NoteState::is_resolved)
    }
}
