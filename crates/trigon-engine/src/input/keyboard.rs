use crate::core::Keyboard;

use super::frame::InputFrame;
use super::state::InputState;
use super::types::Key;

/// Read-only keyboard view over one frame's input.
///
/// This is the `Keyboard` capability the runtime hands to `Scene::update`.
#[derive(Debug, Copy, Clone)]
pub struct KeyboardView<'a> {
    state: &'a InputState,
    frame: &'a InputFrame,
}

impl<'a> KeyboardView<'a> {
    pub fn new(state: &'a InputState, frame: &'a InputFrame) -> Self {
        Self { state, frame }
    }
}

impl Keyboard for KeyboardView<'_> {
    fn is_pressed(&self, key: Key) -> bool {
        self.frame.keys_pressed.contains(&key)
    }

    fn is_down(&self, key: Key) -> bool {
        self.state.key_down(key)
    }

    fn is_released(&self, key: Key) -> bool {
        self.frame.keys_released.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyState};

    #[test]
    fn view_reports_transitions_and_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::Escape, state: KeyState::Pressed },
        );

        let view = KeyboardView::new(&state, &frame);
        assert!(view.is_pressed(Key::Escape));
        assert!(view.is_down(Key::Escape));
        assert!(!view.is_released(Key::Escape));
        assert!(!view.is_pressed(Key::Space));

        frame.clear();
        let view = KeyboardView::new(&state, &frame);
        assert!(!view.is_pressed(Key::Escape));
        assert!(view.is_down(Key::Escape));
    }
}
