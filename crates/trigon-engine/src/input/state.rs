use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Keys currently held in the window.
///
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match ev {
            InputEvent::Focused(true) => {}

            InputEvent::Focused(false) => {
                // Releases are not delivered to an unfocused window.
                for key in self.keys_down.drain() {
                    frame.keys_released.insert(key);
                }
            }

            InputEvent::Key { key, state: KeyState::Pressed } => {
                // repeats of a held key are not new presses
                if self.keys_down.insert(key) {
                    frame.keys_pressed.insert(key);
                }
            }

            InputEvent::Key { key, state: KeyState::Released } => {
                if self.keys_down.remove(&key) {
                    frame.keys_released.insert(key);
                }
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state }
    }

    #[test]
    fn press_is_recorded_once() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        assert!(state.key_down(Key::Escape));
        assert!(frame.keys_pressed.contains(&Key::Escape));

        // OS key-repeat while held is not a new press
        frame.clear();
        state.apply_event(&mut frame, key(Key::Escape, KeyState::Pressed));
        assert!(state.key_down(Key::Escape));
        assert!(frame.keys_pressed.is_empty());
    }

    #[test]
    fn release_clears_down_state() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::A, KeyState::Pressed));
        frame.clear();
        state.apply_event(&mut frame, key(Key::A, KeyState::Released));

        assert!(!state.key_down(Key::A));
        assert!(frame.keys_released.contains(&Key::A));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::B, KeyState::Released));
        assert!(frame.keys_released.is_empty());
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, key(Key::Shift, KeyState::Pressed));
        frame.clear();
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(state.keys_down.is_empty());
        assert!(frame.keys_released.contains(&Key::Shift));

        // focus gain changes nothing
        state.apply_event(&mut frame, InputEvent::Focused(true));
        assert!(state.keys_down.is_empty());
    }
}
