//! Scenes driven by the runtime.
//!
//! `TriangleScene` builds one program and one static mesh in `init` and draws
//! them every frame; `ExitKey` maps a key press to a window-close request.

mod config;
mod error;
mod exit;
mod triangle;

pub use config::{SceneConfig, TRIANGLE_FRAGMENT_SHADER, TRIANGLE_POSITIONS, TRIANGLE_VERTEX_SHADER};
pub use error::SceneError;
pub use exit::ExitKey;
pub use triangle::{ScenePhase, TriangleScene};
