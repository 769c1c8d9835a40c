//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per redraw yields the `secs`
//! handed to `Scene::update`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
