pub mod events;

use crossbeam_channel::{unbounded, Receiver, Sender, TryIter};
use kana_schema::Replay;

use self::events::KeyEvent;

/// Keystrokes waiting for the session, fed by any number of producer threads.
pub struct InputQueue {
    sender: Sender<KeyEvent>,
    receiver: Receiver<KeyEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Queues every frame of `replay` in recorded order.
    pub fn from_replay(replay: &Replay) -> Self {
        let queue = Self::new();
        for &frame in &replay.frames {
            queue.push(frame.into());
        }
        queue
    }

    pub fn push(&self, event: KeyEvent) {
        // The receiver lives as long as `self`, so this cannot disconnect.
        let _ = self.sender.send(event);
    }

    /// Next waiting keystroke, without blocking.
    pub fn pop(&self) -> Option<KeyEvent> {
        self.receiver.try_recv().ok()
    }

    /// Yields what is queued right now; events pushed while iterating are picked up too.
    pub fn drain(&self) -> TryIter<'_, KeyEvent> {
        self.receiver.try_iter()
    }

    /// A handle for a keyboard thread.
    pub fn sender(&self) -> Sender<KeyEvent> {
        self.sender.clone()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
