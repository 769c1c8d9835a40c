use std::collections::HashSet;

use super::types::Key;

/// Key transitions since the last `update`.
///
/// `InputState` holds what is currently down; `InputFrame` holds what changed.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Keys that went down this frame.
    pub keys_pressed: HashSet<Key>,

    /// Keys that went up this frame.
    pub keys_released: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }
}
