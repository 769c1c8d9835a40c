use thiserror::Error;

use super::ShaderStage;

/// A single shader stage failed to parse or validate.
///
/// `log` holds the compiler diagnostic rendered against the source text.
#[derive(Debug, Clone, Error)]
#[error("unable to compile {stage} shader `{label}`:\n{log}")]
pub struct ShaderCompileError {
    pub stage: ShaderStage,
    pub label: String,
    pub log: String,
}

/// Compiled stages could not be combined into a program.
///
/// `log` holds one `error:` line per failed link check.
#[derive(Debug, Clone, Error)]
#[error("unable to link program `{label}`:\n{log}")]
pub struct ShaderLinkError {
    pub label: String,
    pub log: String,
}
