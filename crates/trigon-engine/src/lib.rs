//! Trigon engine crate.
//!
//! Draws a single static triangle through a programmable pipeline: WGSL stages
//! are compiled and linked into a program, a position-only mesh is bound to the
//! program's `aPosition` attribute, and a scene issues one draw per frame inside
//! a winit window.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod shader;
pub mod time;
pub mod window;
