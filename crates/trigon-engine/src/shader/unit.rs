use std::borrow::Cow;
use std::fmt;

use super::error::ShaderCompileError;
use super::interface::{reflect_uniforms, StageInterface, UniformVar};

/// Programmable pipeline stage a source is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// WGSL source text for one stage.
///
/// Immutable once created; `compile` reads it without consuming it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    stage: ShaderStage,
    label: String,
    text: Cow<'static, str>,
}

impl ShaderSource {
    pub fn new(
        stage: ShaderStage,
        label: impl Into<String>,
        text: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            stage,
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn vertex(label: impl Into<String>, text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ShaderStage::Vertex, label, text)
    }

    pub fn fragment(label: impl Into<String>, text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ShaderStage::Fragment, label, text)
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A validated single-stage shader, ready to be linked.
///
/// Not `Clone`: a compiled stage is consumed by exactly one link.
#[derive(Debug)]
pub struct CompiledShader {
    stage: ShaderStage,
    label: String,
    text: Cow<'static, str>,
    entry_point: String,
    interface: StageInterface,
    uniforms: Vec<UniformVar>,
}

impl CompiledShader {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn interface(&self) -> &StageInterface {
        &self.interface
    }

    pub fn uniforms(&self) -> &[UniformVar] {
        &self.uniforms
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }
}

/// Compiles one stage: parse, validate, then locate the stage's entry point.
///
/// The source must declare exactly one entry point for `source.stage()`; entry
/// points of other stages are ignored.
pub fn compile(source: &ShaderSource) -> Result<CompiledShader, ShaderCompileError> {
    let fail = |log: String| ShaderCompileError {
        stage: source.stage,
        label: source.label.clone(),
        log,
    };

    let module = naga::front::wgsl::parse_str(source.text())
        .map_err(|e| fail(e.emit_to_string(source.text())))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| fail(e.emit_to_string(source.text())))?;

    let stage = source.stage.to_naga();
    let mut candidates = module.entry_points.iter().filter(|ep| ep.stage == stage);
    let entry = match (candidates.next(), candidates.next()) {
        (Some(entry), None) => entry,
        (None, _) => {
            return Err(fail(format!("error: no {} entry point declared", source.stage)));
        }
        (Some(_), Some(_)) => {
            return Err(fail(format!(
                "error: more than one {} entry point declared; exactly one is required",
                source.stage
            )));
        }
    };

    let compiled = CompiledShader {
        stage: source.stage,
        label: source.label.clone(),
        text: source.text.clone(),
        entry_point: entry.name.clone(),
        interface: StageInterface::reflect(&module, entry),
        uniforms: reflect_uniforms(&module),
    };

    log::debug!(
        "compiled {} shader `{}` (entry `{}`, {} inputs, {} outputs)",
        compiled.stage,
        compiled.label,
        compiled.entry_point,
        compiled.interface.inputs.len(),
        compiled.interface.outputs.len()
    );

    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSTHROUGH: &str = "
        @vertex
        fn vs_main(@location(0) aPosition: vec2<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(aPosition, 0.0, 1.0);
        }
    ";

    #[test]
    fn compiles_valid_vertex_source() {
        let compiled = compile(&ShaderSource::vertex("passthrough", PASSTHROUGH)).unwrap();

        assert_eq!(compiled.stage(), ShaderStage::Vertex);
        assert_eq!(compiled.entry_point(), "vs_main");
        assert_eq!(compiled.interface().input("aPosition").unwrap().location, 0);
    }

    #[test]
    fn syntax_error_carries_diagnostic() {
        let err = compile(&ShaderSource::vertex("broken", "@vertex fn vs_main( {")).unwrap_err();

        assert_eq!(err.stage, ShaderStage::Vertex);
        assert_eq!(err.label, "broken");
        assert!(!err.log.trim().is_empty());
    }

    #[test]
    fn type_error_is_a_compile_error() {
        let src = "
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                let c: vec4<f32> = vec2<f32>(1.0, 0.0);
                return c;
            }
        ";
        let err = compile(&ShaderSource::fragment("mistyped", src)).unwrap_err();

        assert_eq!(err.stage, ShaderStage::Fragment);
        assert!(!err.log.is_empty());
        assert!(err.to_string().contains("mistyped"));
    }

    #[test]
    fn missing_stage_entry_point_is_rejected() {
        // valid WGSL, but no fragment entry point
        let err = compile(&ShaderSource::fragment("vs only", PASSTHROUGH)).unwrap_err();
        assert!(err.log.contains("no fragment entry point"));
    }

    #[test]
    fn ambiguous_entry_points_are_rejected() {
        let src = "
            @fragment fn a() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }
            @fragment fn b() -> @location(0) vec4<f32> { return vec4<f32>(0.0); }
        ";
        let err = compile(&ShaderSource::fragment("two", src)).unwrap_err();
        assert!(err.log.contains("more than one fragment entry point"));
    }

    #[test]
    fn source_is_not_consumed() {
        let source = ShaderSource::vertex("reuse", PASSTHROUGH);
        let a = compile(&source).unwrap();
        let b = compile(&source).unwrap();
        assert_eq!(a.entry_point(), b.entry_point());
        assert_eq!(source.text(), PASSTHROUGH);
    }
}
