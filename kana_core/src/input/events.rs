use kana_schema::{Millis, ReplayFrame};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub character: char,
    /// Song time at which the character was typed
    pub time: Millis,
}

impl KeyEvent {
    pub fn new(character: char, time: Millis) -> Self {
        Self { character, time }
    }
}

impl From<ReplayFrame> for KeyEvent {
    fn from(frame: ReplayFrame) -> Self {
        Self::new(frame.character, frame.time)
    }
}

impl From<KeyEvent> for ReplayFrame {
    fn from(event: KeyEvent) -> Self {
        ReplayFrame {
            character: event.character,
            time: event.time,
        }
    }
}
