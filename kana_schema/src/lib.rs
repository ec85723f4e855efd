use serde::{Deserialize, Serialize};

/// Song-relative time in milliseconds.
pub type Millis = f64;

pub const DEFAULT_STRICTNESS: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Beatmap {
    pub meta: Metadata,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub notes: Vec<Note>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub mapper: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Difficulty {
    pub strictness: f64,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            strictness: DEFAULT_STRICTNESS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub time: Millis,
    pub text: String,
    /// Precomputed romanization. Empty means "derive from `text`".
    #[serde(default)]
    pub syllables: Vec<Syllable>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Syllable {
    pub kana: String,
    pub romaji: Vec<String>,
}

impl Syllable {
    pub fn new<I, S>(kana: impl Into<String>, romaji: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kana: kana.into(),
            romaji: romaji.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub start: Millis,
    pub end: Millis,
    #[serde(default)]
    pub text: String,
    #[serde(flatten)]
    pub kind: EventKind,
}

impl Event {
    pub fn length(&self) -> Millis {
        self.end - self.start
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type")]
pub enum EventKind {
    #[serde(rename = "lyric")]
    Lyric,

    #[serde(rename = "typing_cutoff")]
    TypingCutoff,

    #[serde(rename = "beatline_bar")]
    BeatLineBar,

    #[serde(rename = "beatline_beat")]
    BeatLineBeat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReplayFrame {
    pub character: char,
    pub time: Millis,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Replay {
    pub beatmap_id: String,
    pub frames: Vec<ReplayFrame>,
}
