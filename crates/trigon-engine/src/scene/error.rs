use thiserror::Error;

use crate::render::MeshError;
use crate::shader::{ShaderCompileError, ShaderLinkError};

/// Failure of `Scene::init`. Every variant is fatal to the scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Compile(#[from] ShaderCompileError),

    #[error(transparent)]
    Link(#[from] ShaderLinkError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error("scene was already initialized or has been disposed")]
    AlreadyInitialized,
}
