use std::{fs, path::Path};

use anyhow::Context;
use kana_core::{Chart, HitState, Score, Session, SessionConfig, Verdict};
use kana_schema::{Beatmap, Millis, Replay, ReplayFrame};
use log::{info, warn};
use serde::Serialize;

pub fn load_beatmap_json_from_path(path: impl AsRef<Path>) -> anyhow::Result<Beatmap> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("failed to read beatmap: {}", path.display()))?;
    let map: Beatmap = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse beatmap json: {}", path.display()))?;
    Ok(map)
}

pub fn load_beatmap_json_from_str(json: &str) -> anyhow::Result<Beatmap> {
    let map: Beatmap = serde_json::from_str(json).context("failed to parse beatmap json")?;
    Ok(map)
}

pub fn load_replay_json_from_path(path: impl AsRef<Path>) -> anyhow::Result<Replay> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("failed to read replay: {}", path.display()))?;
    let replay: Replay = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse replay json: {}", path.display()))?;
    Ok(replay)
}

pub fn load_config_json_from_path(path: impl AsRef<Path>) -> anyhow::Result<SessionConfig> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: SessionConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse config json: {}", path.display()))?;
    Ok(config)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayReport {
    pub beatmap_id: String,
    pub strictness: f64,
    pub complete: bool,
    pub score: Score,
    pub notes: Vec<HitState>,
    pub verdicts: Vec<Verdict>,
}

/// Plays `replay` against a fresh session, then ends the song after the last note, event or
/// keystroke.
pub fn run_replay(map: &Beatmap, replay: &Replay, config: &SessionConfig) -> PlayReport {
    if replay.beatmap_id != map.meta.id {
        warn!(
            "replay was recorded on {:?}, playing it on {:?}",
            replay.beatmap_id, map.meta.id
        );
    }

    let config = SessionConfig {
        record_replay: false,
        ..config.clone()
    };
    let mut session = Session::new(map, &config);
    let mut verdicts = Vec::new();

    for frame in &replay.frames {
        verdicts.extend(session.advance_time(frame.time).verdicts);
        let outcome = session.submit_keystroke(frame.character, frame.time);
        verdicts.extend_from_slice(outcome.verdicts());
    }
    verdicts.extend(session.finish(song_end(map, replay)).verdicts);

    let score = session.score();
    info!(
        "{}: {} points, {:.2}% accuracy, max combo {}",
        map.meta.id,
        score.total_points,
        score.accuracy * 100.0,
        score.max_combo
    );

    PlayReport {
        beatmap_id: map.meta.id.clone(),
        strictness: session.strictness(),
        complete: session.is_complete(),
        notes: session.notes().iter().map(|n| n.hit_state()).collect(),
        score,
        verdicts,
    }
}

/// A replay that types every note's preferred romanization exactly on time.
pub fn autoplay(map: &Beatmap) -> Replay {
    let chart = Chart::from_beatmap(map);
    let mut frames = Vec::new();

    for note in chart.notes() {
        let Some(path) = note.preferred_path() else {
            warn!("autoplay skips note {}: no romanization", note.id);
            continue;
        };
        frames.extend(path.chars().map(|character| ReplayFrame {
            character,
            time: note.time,
        }));
    }

    Replay {
        beatmap_id: map.meta.id.clone(),
        frames,
    }
}

fn song_end(map: &Beatmap, replay: &Replay) -> Millis {
    let last_note = map.notes.iter().map(|n| n.time);
    let last_event = map.events.iter().map(|e| e.start + e.length().max(0.0));
    let last_frame = replay.frames.iter().map(|f| f.time);
    last_note
        .chain(last_event)
        .chain(last_frame)
        .fold(0.0, Millis::max)
}
