//! GPU rendering subsystem.
//!
//! Owns the static mesh binding (vertex buffer + attribute layout baked into a
//! pipeline) and the renderer-facing contexts handed to scenes.
//!
//! Convention:
//! - positions are already in clip space (x, y in [-1, 1]); no viewport transform.
//! - every draw happens inside a render pass; ending the pass clears all bindings.

mod ctx;
mod mesh;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{
    AttributeBinding, ComponentType, DrawCall, Mesh, MeshError, MeshLayout, PrimitiveTopology,
    POSITION_ATTRIBUTE,
};
