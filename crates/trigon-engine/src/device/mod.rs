//! GPU device management.
//!
//! [`Gpu`] binds a device to a window surface for the interactive runtime;
//! [`Headless`] opens a device without a surface and renders into an
//! [`OffscreenTarget`] that can be read back.

mod gpu;
mod headless;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use headless::{Headless, OffscreenTarget};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
