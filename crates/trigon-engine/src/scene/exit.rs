use crate::core::{Keyboard, WindowControl};
use crate::input::Key;

/// Watches a single key and turns its press into a window-close request.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ExitKey {
    key: Key,
}

impl ExitKey {
    pub fn new(key: Key) -> Self {
        Self { key }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    /// Requests close once if the key went down this frame.
    ///
    /// Returns whether a close was requested.
    pub fn poll(&self, keyboard: &dyn Keyboard, window: &mut dyn WindowControl) -> bool {
        if !keyboard.is_pressed(self.key) {
            return false;
        }
        log::debug!("exit key {} pressed; requesting window close", self.key);
        window.request_close();
        true
    }
}

impl Default for ExitKey {
    fn default() -> Self {
        Self::new(Key::Escape)
    }
}
