use crate::render::{RenderCtx, RenderTarget};

use super::ctx::{Keyboard, WindowControl};

/// Lifecycle contract between the runtime and a scene.
///
/// Call pattern: `init` once, then `update`/`draw` alternating once per frame,
/// then `deinit` once at shutdown. All calls happen on the event-loop thread.
pub trait Scene {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Creates every GPU resource the scene needs.
    ///
    /// On error the scene is unusable and the host terminates.
    fn init(&mut self, ctx: &RenderCtx<'_>) -> Result<(), Self::Error>;

    /// Per-frame logic. `secs` is the time since the previous frame.
    fn update(&mut self, secs: f32, keyboard: &dyn Keyboard, window: &mut dyn WindowControl);

    /// Records this frame's rendering into `target`.
    fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>);

    /// Releases the scene's resources. Must tolerate repeated calls.
    fn deinit(&mut self);
}
