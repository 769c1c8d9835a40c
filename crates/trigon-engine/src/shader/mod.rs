//! Shader build pipeline.
//!
//! Two stages, each with its own failure point:
//! - `unit`: one WGSL source for one stage → validated `CompiledShader`
//! - `program`: compiled stages → `LinkedProgram` (interface matching + GPU modules)
//!
//! Reflection of stage inputs/outputs lives in `interface` and is what the mesh
//! binding step uses to resolve attribute locations by name.

mod error;
mod interface;
mod program;
mod unit;

pub use error::{ShaderCompileError, ShaderLinkError};
pub use interface::{InterfaceVar, ResourceBinding, ScalarKind, StageInterface, UniformVar, ValueType};
pub use program::{LinkedProgram, ProgramInterface};
pub use unit::{compile, CompiledShader, ShaderSource, ShaderStage};
