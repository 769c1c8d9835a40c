use crate::input::Key;

/// Keyboard state query handed to `Scene::update`.
pub trait Keyboard {
    /// The key went down since the previous update.
    fn is_pressed(&self, key: Key) -> bool;

    /// The key is currently held.
    fn is_down(&self, key: Key) -> bool;

    /// The key went up since the previous update.
    fn is_released(&self, key: Key) -> bool;
}

/// Control over the window hosting the scene.
pub trait WindowControl {
    /// Asks the host to close the window after the current callback.
    ///
    /// The host tears the scene down; the caller does not.
    fn request_close(&mut self);
}
