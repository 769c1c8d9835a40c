//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single scene window, wires them to the
//! GPU layer and drives the scene lifecycle.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
