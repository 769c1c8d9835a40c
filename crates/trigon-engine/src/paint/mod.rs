//! Color model used for clear colors.
//!
//! Colors are linear and premultiplied; conversion to wgpu happens at the
//! render pass boundary.

pub mod color;

pub use color::Color;
