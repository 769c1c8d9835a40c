//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform loop)
//! and a scene: the four lifecycle hooks plus the capabilities injected into
//! them. Scenes never reach for global input or window state.

mod ctx;
mod scene;

pub use ctx::{Keyboard, WindowControl};
pub use scene::Scene;
