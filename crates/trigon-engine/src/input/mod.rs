//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! `platform` translates window-system events into `InputEvent`s.

mod frame;
mod keyboard;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use keyboard::KeyboardView;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
