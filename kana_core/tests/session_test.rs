use kana_core::config::SessionConfig;
use kana_core::error::JudgeError;
use kana_core::gameplay::judge::KeystrokeOutcome;
use kana_core::gameplay::Outcome;
use kana_core::input::events::KeyEvent;
use kana_core::input::InputQueue;
use kana_core::session::{Feedback, Session};
use kana_core::{Grade, HitState};
use kana_schema::{Beatmap, Difficulty, Event, EventKind, Metadata, Note, Syllable};
use proptest::prelude::*;

fn note(time: f64, text: &str) -> Note {
    Note {
        time,
        text: text.to_string(),
        syllables: vec![],
    }
}

fn beatmap(notes: Vec<Note>) -> Beatmap {
    Beatmap {
        meta: Metadata {
            id: "session".to_string(),
            title: "Session".to_string(),
            artist: "Tester".to_string(),
            mapper: String::new(),
        },
        difficulty: Difficulty::default(),
        notes,
        events: vec![Event {
            start: 2500.0,
            end: 2500.0,
            text: String::new(),
            kind: EventKind::TypingCutoff,
        }],
    }
}

fn sample_map() -> Beatmap {
    beatmap(vec![
        note(1000.0, "か"),
        note(1200.0, "さ"),
        note(1400.0, "し"),
        note(1600.0, "た"),
        note(1800.0, "かんじ"),
    ])
}

fn type_str(session: &mut Session, s: &str, time: f64) -> Vec<KeystrokeOutcome> {
    s.chars().map(|c| session.submit_keystroke(c, time)).collect()
}

#[test]
fn shortest_path_at_target_time_is_excellent() {
    let map = sample_map();
    let mut session = Session::new(&map, &SessionConfig::default());

    for id in 0..map.notes.len() {
        let target = map.notes[id].time;
        session.advance_time(target);
        let path = session.note(id).unwrap().shortest_path().unwrap();
        let combo_before = session.score().current_combo;

        type_str(&mut session, &path, target);

        assert_eq!(session.note_state(id), Some(HitState::Hit(Grade::Excellent)));
        assert_eq!(session.score().current_combo, combo_before + 1);
    }
    assert!(session.is_complete());
    assert_eq!(session.score().accuracy, 1.0);
}

#[test]
fn lookahead_through_the_session_surface() {
    let mut session = Session::new(&sample_map(), &SessionConfig::default());

    session.submit_keystroke('s', 1250.0);

    assert_eq!(session.note_state(0), Some(HitState::Missed));
    assert_eq!(session.cursor(), 1);
    assert_eq!(session.note(1).unwrap().typed_prefix().len(), 1);
    assert_eq!(session.score().miss, 1);
}

#[test]
fn ambiguous_hatsuon_accepts_both_spellings() {
    for typed in ["kanji", "kannji", "kaxnzi"] {
        let mut session = Session::new(&beatmap(vec![note(1000.0, "かんじ")]), &SessionConfig::default());
        let outcomes = type_str(&mut session, typed, 1000.0);
        assert!(outcomes.iter().all(KeystrokeOutcome::is_accepted), "{typed}");
        assert_eq!(session.note_state(0), Some(HitState::Hit(Grade::Excellent)), "{typed}");
    }
}

#[test]
fn feedback_channel_reports_every_transition() {
    let mut session = Session::new(&beatmap(vec![note(1000.0, "か")]), &SessionConfig::default());
    let feedback = session.subscribe();

    session.submit_keystroke('z', 1000.0);
    type_str(&mut session, "ka", 1010.0);

    let received: Vec<Feedback> = feedback.try_iter().collect();
    assert_eq!(received[0], Feedback::CharacterRejected { character: 'z' });
    assert_eq!(received[1], Feedback::CharacterAccepted { character: 'k', note: 0 });
    match &received[2] {
        Feedback::Verdict(v) => {
            assert_eq!(v.note, 0);
            assert_eq!(v.outcome, Outcome::Hit(Grade::Excellent));
            assert_eq!(v.delta_ms, Some(10.0));
        }
        other => panic!("expected verdict, got {other:?}"),
    }
    assert_eq!(received[3], Feedback::CharacterAccepted { character: 'a', note: 0 });
    assert_eq!(received[4], Feedback::SessionComplete);
    assert_eq!(received.len(), 5);

    // Completion is only signalled once.
    let tick = session.advance_time(2000.0);
    assert!(!tick.session_completed);
    assert!(feedback.try_recv().is_err());
}

#[test]
fn typing_the_last_note_reports_completion_once() {
    let mut session = Session::new(&beatmap(vec![note(1000.0, "か")]), &SessionConfig::default());

    let outcomes = type_str(&mut session, "ka", 1000.0);

    assert!(!outcomes[0].session_completed());
    assert!(outcomes[1].session_completed());
    assert!(session.is_complete());
    assert!(!session.advance_time(1500.0).session_completed);
    assert!(!session.finish(2000.0).session_completed);
}

#[test]
fn precomputed_syllables_accept_either_reading_of_a_boundary() {
    let mut map = beatmap(vec![note(1000.0, "んな")]);
    map.notes[0].syllables = vec![
        Syllable::new("ん", ["n", "nn", "xn"]),
        Syllable::new("な", ["na"]),
    ];
    let mut session = Session::new(&map, &SessionConfig::default());

    let outcomes = type_str(&mut session, "nna", 1000.0);

    assert!(outcomes.iter().all(KeystrokeOutcome::is_accepted));
    assert_eq!(session.note_state(0), Some(HitState::Hit(Grade::Excellent)));
    assert_eq!(session.note(0).unwrap().typed_prefix(), "nna");
}

#[test]
fn calls_after_completion_are_ignored() {
    let mut session = Session::new(&beatmap(vec![note(1000.0, "か")]), &SessionConfig::default());
    type_str(&mut session, "ka", 1000.0);
    let before = session.score();

    assert_eq!(session.submit_keystroke('k', 1100.0), KeystrokeOutcome::Ignored);
    assert_eq!(
        session.try_submit_keystroke('k', 1100.0),
        Err(JudgeError::InvalidSessionState)
    );
    assert_eq!(session.try_advance_time(1200.0), Err(JudgeError::InvalidSessionState));
    assert_eq!(session.score(), before);
}

#[test]
fn backwards_time_is_clamped_or_reported() {
    let mut session = Session::new(&sample_map(), &SessionConfig::default());
    session.advance_time(1000.0);

    assert_eq!(
        session.try_advance_time(900.0),
        Err(JudgeError::NonMonotonicTime {
            last: 1000.0,
            got: 900.0
        })
    );

    // The lenient path clamps the keystroke to 1000ms.
    type_str(&mut session, "ka", 980.0);
    assert_eq!(session.note_state(0), Some(HitState::Hit(Grade::Excellent)));
    let frames = session.replay().unwrap().frames;
    assert!(frames.iter().all(|f| f.time == 1000.0));
}

#[test]
fn tick_misses_notes_once_the_next_is_due() {
    let mut session = Session::new(&sample_map(), &SessionConfig::default());

    let tick = session.advance_time(1400.0);
    let missed: Vec<usize> = tick.verdicts.iter().map(|v| v.note).collect();
    assert_eq!(missed, vec![0, 1]);
    assert_eq!(session.cursor(), 2);
    assert_eq!(session.score().miss, 2);
    assert_eq!(session.score().accuracy, 0.0);
}

#[test]
fn cutoff_resolves_the_final_note() {
    let mut session = Session::new(&sample_map(), &SessionConfig::default());

    session.advance_time(1800.0);
    assert_eq!(session.cursor(), 4);

    let tick = session.advance_time(2500.0);
    assert_eq!(tick.verdicts.len(), 1);
    assert!(tick.session_completed);
    assert!(session.is_complete());
}

#[test]
fn finish_misses_everything_left() {
    let mut session = Session::new(&sample_map(), &SessionConfig::default());
    type_str(&mut session, "ka", 1000.0);

    let tick = session.finish(1100.0);

    assert_eq!(tick.verdicts.len(), 4);
    assert!(tick.session_completed);
    assert_eq!(session.score().excellent, 1);
    assert_eq!(session.score().miss, 4);
}

#[test]
fn replay_records_typed_characters_and_can_be_disabled() {
    let mut session = Session::new(&sample_map(), &SessionConfig::default());
    session.submit_keystroke('x', 990.0);
    session.submit_keystroke('\u{8}', 995.0);
    type_str(&mut session, "ka", 1000.0);

    let replay = session.replay().unwrap();
    assert_eq!(replay.beatmap_id, "session");
    let typed: String = replay.frames.iter().map(|f| f.character).collect();
    assert_eq!(typed, "xka");

    let config = SessionConfig {
        record_replay: false,
        ..SessionConfig::default()
    };
    let session = Session::new(&sample_map(), &config);
    assert!(session.replay().is_none());
}

#[test]
fn session_never_mutates_the_beatmap() {
    let map = sample_map();
    let snapshot = map.clone();
    let mut session = Session::new(&map, &SessionConfig::default());
    type_str(&mut session, "kas", 1000.0);
    session.finish(3000.0);

    assert_eq!(map, snapshot);
    assert!(map.notes.iter().all(|n| n.syllables.is_empty()));
}

#[test]
fn strictness_override_and_multiplier_apply() {
    let config = SessionConfig::default()
        .with_strictness(10.0)
        .with_modifiers([1.2, 0.5]);
    let mut session = Session::new(&sample_map(), &config);
    assert_eq!(session.strictness(), 10.0);
    assert_eq!(session.windows().excellent, 10.0);

    // 15ms is good under strictness 10.
    type_str(&mut session, "ka", 1015.0);
    assert_eq!(session.note_state(0), Some(HitState::Hit(Grade::Good)));
    assert_eq!(session.score().total_points, 600);
}

#[test]
fn pump_drains_the_input_queue_in_order() {
    let queue = InputQueue::new();
    let sender = queue.sender();
    std::thread::spawn(move || {
        for (c, t) in [('k', 1000.0), ('a', 1001.0), ('s', 1200.0)] {
            sender.send(KeyEvent::new(c, t)).unwrap();
        }
    })
    .join()
    .unwrap();

    let mut session = Session::new(&sample_map(), &SessionConfig::default());
    let outcomes = session.pump(&queue);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(KeystrokeOutcome::is_accepted));
    assert_eq!(session.note_state(0), Some(HitState::Hit(Grade::Excellent)));
    assert_eq!(session.note(1).unwrap().typed_prefix(), "s");
    assert!(queue.pop().is_none());
}

#[derive(Debug, Clone)]
enum Action {
    Key(char),
    Tick,
}

fn action() -> impl Strategy<Value = (Action, u16)> {
    (
        prop_oneof![
            3 => prop::sample::select(vec!['k', 'a', 's', 'h', 'i', 't', 'n', 'j', 'x', '\n'])
                .prop_map(Action::Key),
            1 => Just(Action::Tick),
        ],
        0u16..150,
    )
}

fn play(actions: &[(Action, u16)]) -> Session {
    let mut session = Session::new(&sample_map(), &SessionConfig::default());
    let mut time = 800.0;
    for (action, dt) in actions {
        time += *dt as f64;
        match action {
            Action::Key(c) => {
                session.submit_keystroke(*c, time);
            }
            Action::Tick => {
                session.advance_time(time);
            }
        }
    }
    session
}

proptest! {
    #[test]
    fn session_invariants_hold(actions in prop::collection::vec(action(), 0..120)) {
        let mut session = Session::new(&sample_map(), &SessionConfig::default());
        let mut time = 800.0;
        let mut prev_states: Vec<HitState> = vec![HitState::NotHit; session.notes().len()];
        let mut prev_max_combo = 0;
        let mut prev_points = 0;

        for (action, dt) in &actions {
            time += *dt as f64;
            match action {
                Action::Key(c) => { session.submit_keystroke(*c, time); }
                Action::Tick => { session.advance_time(time); }
            }

            let score = session.score();
            prop_assert!((0.0..=1.0).contains(&score.accuracy));
            prop_assert!(score.max_combo >= prev_max_combo);
            prop_assert!(score.total_points >= prev_points);
            prev_max_combo = score.max_combo;
            prev_points = score.total_points;

            let states: Vec<HitState> = session.notes().iter().map(|n| n.hit_state()).collect();
            for (before, after) in prev_states.iter().zip(&states) {
                if before.is_resolved() {
                    prop_assert_eq!(before, after);
                }
            }
            let resolved = states.iter().filter(|s| s.is_resolved()).count() as u32;
            prop_assert_eq!(score.resolved(), resolved);
            prop_assert!(states[..session.cursor()].iter().all(|s| s.is_resolved()));
            prev_states = states;
        }
    }

    #[test]
    fn identical_input_replays_identically(actions in prop::collection::vec(action(), 0..120)) {
        let a = play(&actions);
        let b = play(&actions);
        prop_assert_eq!(a.score(), b.score());
        let states_a: Vec<HitState> = a.notes().iter().map(|n| n.hit_state()).collect();
        let states_b: Vec<HitState> = b.notes().iter().map(|n| n.hit_state()).collect();
        prop_assert_eq!(states_a, states_b);
    }
}
