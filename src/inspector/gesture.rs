use std::time::{Duration, Instant};

/// A key event delivered to the [`crate::Inspector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Char(char),
    /// Either control key.
    Control,
    /// Either shift key.
    Shift,
    /// Either alt key.
    Alt,
    /// The escape key.
    Escape,
    /// The enter key.
    Enter,
    /// The backspace key.
    Backspace,
}

/// Recognizes the same key pressed twice within a time window.
#[derive(Debug)]
pub struct DoubleTap {
    key: Key,
    window: Duration,
    last_press: Option<Instant>,
}

impl DoubleTap {
    /// Creates a detector for `key` with the longest accepted gap of `window`.
    pub fn new(key: Key, window: Duration) -> Self {
        Self {
            key,
            window,
            last_press: None,
        }
    }

    /// Feeds a key press that happened at `at`. Returns `true` when it completes a double tap.
    ///
    /// Any other key breaks the sequence. A completed double tap starts a new one, so a
    /// third quick press doesn't count as another double tap.
    pub fn press(&mut self, key: Key, at: Instant) -> bool {
        if key != self.key {
            self.last_press = None;
            return false;
        }
        match self.last_press.take() {
            Some(prev) if at.saturating_duration_since(prev) <= self.window => true,
            _ => {
                self.last_press = Some(at);
                false
            }
        }
    }

    /// Forgets a pending first press.
    pub fn reset(&mut self) {
        self.last_press = None;
    }
}
