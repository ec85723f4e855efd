use crossbeam_channel::{unbounded, Receiver, Sender};
use kana_schema::{Beatmap, Millis, Replay, ReplayFrame};
use log::debug;

use crate::chart::{Chart, HitState, NoteState};
use crate::config::SessionConfig;
use crate::error::JudgeError;
use crate::gameplay::judge::{JudgeMachine, KeystrokeOutcome, TickOutcome};
use crate::gameplay::score::{Score, ScoreAccumulator};
use crate::gameplay::timing::TimingWindows;
use crate::gameplay::Verdict;
use crate::input::events::KeyEvent;
use crate::input::InputQueue;
use crate::time::clock::PlaybackClock;

/// Pushed to subscribers for UI and audio cues.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    Verdict(Verdict),
    CharacterAccepted { character: char, note: usize },
    CharacterRejected { character: char },
    SessionComplete,
}

/// One play of one beatmap. Owns its copy of the notes; nothing is shared between sessions.
pub struct Session {
    beatmap_id: String,
    strictness: f64,
    chart: Chart,
    judge: JudgeMachine,
    score: ScoreAccumulator,
    clock: PlaybackClock,
    replay: Option<Vec<ReplayFrame>>,
    feedback: Option<Sender<Feedback>>,
}

impl Session {
    pub fn new(beatmap: &Beatmap, config: &SessionConfig) -> Self {
        let strictness = config.resolve_strictness(&beatmap.difficulty);
        Self {
            beatmap_id: beatmap.meta.id.clone(),
            strictness,
            chart: Chart::from_beatmap(beatmap),
            judge: JudgeMachine::new(TimingWindows::from_strictness(strictness)),
            score: ScoreAccumulator::new(config.score_multiplier),
            clock: PlaybackClock::new(),
            replay: config.record_replay.then(Vec::new),
            feedback: None,
        }
    }

    /// Opens the push channel. A later call replaces the earlier subscriber.
    pub fn subscribe(&mut self) -> Receiver<Feedback> {
        let (sender, receiver) = unbounded();
        self.feedback = Some(sender);
        receiver
    }

    pub fn submit_keystroke(&mut self, character: char, time: Millis) -> KeystrokeOutcome {
        if self.is_complete() {
            debug!("'{character}' ignored: {}", JudgeError::InvalidSessionState);
            return KeystrokeOutcome::Ignored;
        }
        let time = self.clock.clamp(time);
        self.keystroke_at(character, time)
    }

    pub fn try_submit_keystroke(
        &mut self,
        character: char,
        time: Millis,
    ) -> Result<KeystrokeOutcome, JudgeError> {
        if self.is_complete() {
            return Err(JudgeError::InvalidSessionState);
        }
        let time = self.clock.observe(time)?;
        Ok(self.keystroke_at(character, time))
    }

    pub fn advance_time(&mut self, time: Millis) -> TickOutcome {
        if self.is_complete() {
            return self.tick_at(self.clock.last().unwrap_or(time));
        }
        let time = self.clock.clamp(time);
        self.tick_at(time)
    }

    pub fn try_advance_time(&mut self, time: Millis) -> Result<TickOutcome, JudgeError> {
        if self.is_complete() {
            return Err(JudgeError::InvalidSessionState);
        }
        let time = self.clock.observe(time)?;
        Ok(self.tick_at(time))
    }

    /// Ends the song: every note still unresolved is missed.
    pub fn finish(&mut self, time: Millis) -> TickOutcome {
        let time = self.clock.clamp(time);
        let verdicts = self.judge.finish(time, &mut self.chart);
        self.publish(&verdicts);
        TickOutcome {
            verdicts,
            session_completed: self.take_completion(),
        }
    }

    /// Processes every keystroke waiting in `queue`, in arrival order.
    pub fn pump(&mut self, queue: &InputQueue) -> Vec<KeystrokeOutcome> {
        queue
            .drain()
            .map(|event| self.submit_keystroke(event.character, event.time))
            .collect()
    }

    pub fn score(&self) -> Score {
        self.score.snapshot()
    }

    pub fn note_state(&self, id: usize) -> Option<HitState> {
        self.chart.note(id).map(NoteState::hit_state)
    }

    pub fn note(&self, id: usize) -> Option<&NoteState> {
        self.chart.note(id)
    }

    pub fn notes(&self) -> &[NoteState] {
        self.chart.notes()
    }

    pub fn cursor(&self) -> usize {
        self.judge.cursor()
    }

    pub fn is_complete(&self) -> bool {
        self.judge.is_complete(&self.chart)
    }

    pub fn strictness(&self) -> f64 {
        self.strictness
    }

    pub fn windows(&self) -> TimingWindows {
        self.judge.windows
    }

    /// The keystrokes recorded so far, if recording is enabled.
    pub fn replay(&self) -> Option<Replay> {
        self.replay.as_ref().map(|frames| Replay {
            beatmap_id: self.beatmap_id.clone(),
            frames: frames.clone(),
        })
    }

    fn keystroke_at(&mut self, character: char, time: Millis) -> KeystrokeOutcome {
        let event = KeyEvent::new(character, time);
        if !character.is_control() {
            if let Some(frames) = self.replay.as_mut() {
                frames.push(event.into());
            }
        }

        let outcome = self.judge.process_input(event, &mut self.chart);
        match &outcome {
            KeystrokeOutcome::Accepted {
                note,
                verdicts,
                session_completed,
                ..
            } => {
                self.publish(verdicts);
                self.emit(Feedback::CharacterAccepted {
                    character,
                    note: *note,
                });
                if *session_completed {
                    self.emit(Feedback::SessionComplete);
                }
            }
            KeystrokeOutcome::Rejected { character } => {
                self.emit(Feedback::CharacterRejected {
                    character: *character,
                });
            }
            KeystrokeOutcome::Ignored => {}
        }
        outcome
    }

    fn tick_at(&mut self, time: Millis) -> TickOutcome {
        let verdicts = self.judge.check_misses(time, &mut self.chart);
        self.publish(&verdicts);
        TickOutcome {
            verdicts,
            session_completed: self.take_completion(),
        }
    }

    fn publish(&mut self, verdicts: &[Verdict]) {
        for verdict in verdicts {
            self.score.apply(verdict);
            self.emit(Feedback::Verdict(*verdict));
        }
    }

    fn take_completion(&mut self) -> bool {
        let completed = self.judge.take_completion(&self.chart);
        if completed {
            self.emit(Feedback::SessionComplete);
        }
        completed
    }

    fn emit(&self, feedback: Feedback) {
        if let Some(sender) = &self.feedback {
            let _ = sender.send(feedback);
        }
    }
}
