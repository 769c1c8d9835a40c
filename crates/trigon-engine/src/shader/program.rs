use super::error::ShaderLinkError;
use super::interface::{InterfaceVar, ResourceBinding, UniformVar};
use super::unit::{CompiledShader, ShaderStage};

/// Merged, validated interface of a vertex + fragment pair.
///
/// This is the CPU half of linking: everything a draw setup needs to know about
/// the program without touching the GPU.
#[derive(Debug, Clone)]
pub struct ProgramInterface {
    label: String,
    vertex_entry: String,
    fragment_entry: String,
    attributes: Vec<InterfaceVar>,
    uniforms: Vec<UniformVar>,
}

impl ProgramInterface {
    /// Runs every link check and collects all failures into one log.
    pub fn link(label: &str, shaders: &[CompiledShader]) -> Result<Self, ShaderLinkError> {
        let mut errors: Vec<String> = Vec::new();

        if shaders.is_empty() {
            errors.push("no shaders attached to program".to_string());
        }

        let vertex: Vec<&CompiledShader> =
            shaders.iter().filter(|s| s.stage() == ShaderStage::Vertex).collect();
        let fragment: Vec<&CompiledShader> =
            shaders.iter().filter(|s| s.stage() == ShaderStage::Fragment).collect();

        for (stage, attached) in [(ShaderStage::Vertex, &vertex), (ShaderStage::Fragment, &fragment)] {
            match attached.len() {
                0 if !shaders.is_empty() => errors.push(format!("no {stage} shader attached")),
                0 | 1 => {}
                n => errors.push(format!("{n} {stage} shaders attached; exactly one is required")),
            }
        }

        if let ([vs], [fs]) = (vertex.as_slice(), fragment.as_slice()) {
            for input in &fs.interface().inputs {
                match vs.interface().output_at(input.location) {
                    None => errors.push(format!(
                        "fragment input `{}` at location {} is not written by vertex shader `{}`",
                        input.display_name(),
                        input.location,
                        vs.label()
                    )),
                    Some(output) if output.ty != input.ty => errors.push(format!(
                        "location {} type mismatch: vertex writes {} but fragment reads {}",
                        input.location, output.ty, input.ty
                    )),
                    Some(_) => {}
                }
            }

            if fs.interface().output_at(0).is_none() {
                errors.push(format!(
                    "fragment shader `{}` writes no color output at location 0",
                    fs.label()
                ));
            }
        }

        if !errors.is_empty() {
            return Err(ShaderLinkError { label: label.to_string(), log: error_log(&errors) });
        }

        let (vs, fs) = (vertex[0], fragment[0]);

        let mut uniforms: Vec<UniformVar> = Vec::new();
        for u in vs.uniforms().iter().chain(fs.uniforms()) {
            if !uniforms.iter().any(|known| known.name == u.name) {
                uniforms.push(u.clone());
            }
        }

        Ok(Self {
            label: label.to_string(),
            vertex_entry: vs.entry_point().to_string(),
            fragment_entry: fs.entry_point().to_string(),
            attributes: vs.interface().inputs.clone(),
            uniforms,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    pub fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    /// Vertex inputs in location order.
    pub fn attributes(&self) -> &[InterfaceVar] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&InterfaceVar> {
        self.attributes.iter().find(|a| a.name.as_deref() == Some(name))
    }

    /// Resolves a vertex attribute location by name.
    pub fn locate(&self, name: &str) -> Option<u32> {
        self.attribute(name).map(|a| a.location)
    }

    /// Resolves a resource global's `@group/@binding` by name.
    pub fn locate_uniform(&self, name: &str) -> Option<ResourceBinding> {
        self.uniforms.iter().find(|u| u.name == name).map(|u| u.binding)
    }

    /// One message per resource global; a [`LinkedProgram`] has no bind groups to serve them.
    pub fn unbound_resources(&self) -> Vec<String> {
        self.uniforms
            .iter()
            .map(|u| {
                format!(
                    "program declares resource `{}` at @group({}) @binding({}) but the pipeline has no bind groups",
                    u.name, u.binding.group, u.binding.binding
                )
            })
            .collect()
    }
}

fn error_log(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("error: {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Linked GPU program: one shader module per stage plus the merged interface.
///
/// The compiled stages are consumed by [`LinkedProgram::link`] and dropped once
/// the modules exist.
pub struct LinkedProgram {
    interface: ProgramInterface,
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
    layout: wgpu::PipelineLayout,
}

impl LinkedProgram {
    /// Links `shaders` into GPU modules with an empty pipeline layout.
    ///
    /// Fails when the CPU link checks fail, when a stage declares resource
    /// globals (the layout has no bind groups), or when the device rejects a
    /// module, e.g. because it needs a feature the device was not opened with.
    pub fn link(
        device: &wgpu::Device,
        label: &str,
        shaders: Vec<CompiledShader>,
    ) -> Result<Self, ShaderLinkError> {
        let interface = ProgramInterface::link(label, &shaders)?;

        let unbound = interface.unbound_resources();
        if !unbound.is_empty() {
            return Err(ShaderLinkError { label: label.to_string(), log: error_log(&unbound) });
        }

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module_for = |stage: ShaderStage| {
            // link checks guarantee exactly one shader per stage
            let shader = shaders.iter().find(|s| s.stage() == stage)?;
            Some(device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(shader.label()),
                source: wgpu::ShaderSource::Wgsl(shader.text().to_owned().into()),
            }))
        };
        let modules = (module_for(ShaderStage::Vertex), module_for(ShaderStage::Fragment));
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(ShaderLinkError {
                label: label.to_string(),
                log: format!("error: device rejected shader module: {err}"),
            });
        }

        let (Some(vertex), Some(fragment)) = modules else {
            return Err(ShaderLinkError {
                label: label.to_string(),
                log: "error: stage set changed during link".to_string(),
            });
        };

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        // Intermediates are single-use; release them now that the modules exist.
        drop(shaders);

        log::debug!(
            "linked program `{}` ({} attributes)",
            interface.label,
            interface.attributes.len()
        );

        Ok(Self {
            interface,
            vertex,
            fragment,
            layout,
        })
    }

    pub fn interface(&self) -> &ProgramInterface {
        &self.interface
    }

    pub fn label(&self) -> &str {
        self.interface.label()
    }

    /// See [`ProgramInterface::locate`].
    pub fn locate(&self, name: &str) -> Option<u32> {
        self.interface.locate(name)
    }

    pub(crate) fn vertex_module(&self) -> &wgpu::ShaderModule {
        &self.vertex
    }

    pub(crate) fn fragment_module(&self) -> &wgpu::ShaderModule {
        &self.fragment
    }

    pub(crate) fn layout(&self) -> &wgpu::PipelineLayout {
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GpuInit, Headless};
    use crate::shader::{compile, ShaderSource};

    const VS: &str = "
        @vertex
        fn vs_main(@location(0) aPosition: vec2<f32>) -> @builtin(position) vec4<f32> {
            return vec4<f32>(aPosition, 0.0, 1.0);
        }
    ";

    const FS: &str = "
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 1.0, 0.0, 1.0);
        }
    ";

    fn vs(src: &'static str) -> CompiledShader {
        compile(&ShaderSource::vertex("vs", src)).unwrap()
    }

    fn fs(src: &'static str) -> CompiledShader {
        compile(&ShaderSource::fragment("fs", src)).unwrap()
    }

    #[test]
    fn links_vertex_and_fragment() {
        let program = ProgramInterface::link("triangle", &[vs(VS), fs(FS)]).unwrap();

        assert_eq!(program.vertex_entry(), "vs_main");
        assert_eq!(program.fragment_entry(), "fs_main");
        assert_eq!(program.locate("aPosition"), Some(0));
        assert_eq!(program.locate("aColor"), None);
    }

    #[test]
    fn attach_order_does_not_matter() {
        let program = ProgramInterface::link("triangle", &[fs(FS), vs(VS)]).unwrap();
        assert_eq!(program.locate("aPosition"), Some(0));
    }

    #[test]
    fn empty_program_fails() {
        let err = ProgramInterface::link("empty", &[]).unwrap_err();
        assert_eq!(err.label, "empty");
        assert!(err.log.contains("no shaders attached"));
    }

    #[test]
    fn missing_fragment_stage_fails() {
        let err = ProgramInterface::link("half", &[vs(VS)]).unwrap_err();
        assert!(err.log.contains("no fragment shader attached"));
    }

    #[test]
    fn duplicate_stage_fails() {
        let err = ProgramInterface::link("double", &[vs(VS), vs(VS), fs(FS)]).unwrap_err();
        assert!(err.log.contains("2 vertex shaders attached"));
    }

    #[test]
    fn unwritten_fragment_input_fails() {
        let fs_src = "
            @fragment
            fn fs_main(@location(2) vTint: vec3<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(vTint, 1.0);
            }
        ";
        let err = ProgramInterface::link("varyings", &[vs(VS), fs(fs_src)]).unwrap_err();
        assert!(err.log.contains("`vTint` at location 2"));
    }

    #[test]
    fn varying_type_mismatch_fails() {
        let vs_src = "
            struct VsOut {
                @builtin(position) clip: vec4<f32>,
                @location(0) tint: vec2<f32>,
            };
            @vertex
            fn vs_main(@location(0) aPosition: vec2<f32>) -> VsOut {
                var o: VsOut;
                o.clip = vec4<f32>(aPosition, 0.0, 1.0);
                o.tint = aPosition;
                return o;
            }
        ";
        let fs_src = "
            @fragment
            fn fs_main(@location(0) tint: vec3<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(tint, 1.0);
            }
        ";
        let err = ProgramInterface::link("mismatch", &[vs(vs_src), fs(fs_src)]).unwrap_err();
        assert!(err.log.contains("vertex writes vec2<f32> but fragment reads vec3<f32>"));
    }

    #[test]
    fn all_failures_are_reported() {
        let err = ProgramInterface::link("many", &[fs(FS), fs(FS)]).unwrap_err();
        let lines: Vec<&str> = err.log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.starts_with("error: ")));
    }

    #[test]
    fn uniforms_are_resolved_by_name() {
        let fs_src = "
            struct Tint { color: vec4<f32> };
            @group(0) @binding(1) var<uniform> tint: Tint;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return tint.color;
            }
        ";
        let program = ProgramInterface::link("uniform", &[vs(VS), fs(fs_src)]).unwrap();
        assert_eq!(
            program.locate_uniform("tint"),
            Some(ResourceBinding { group: 0, binding: 1 })
        );
        assert_eq!(program.locate_uniform("missing"), None);

        let unbound = program.unbound_resources();
        assert_eq!(unbound.len(), 1);
        assert!(unbound[0].contains("`tint` at @group(0) @binding(1)"));
    }

    #[test]
    fn plain_program_needs_no_bind_groups() {
        let program = ProgramInterface::link("triangle", &[vs(VS), fs(FS)]).unwrap();
        assert!(program.unbound_resources().is_empty());
    }

    fn headless() -> Option<Headless> {
        match Headless::request(&GpuInit::default()) {
            Ok(gpu) => Some(gpu),
            Err(e) => {
                eprintln!("no GPU adapter available, skipping: {e:#}");
                None
            }
        }
    }

    #[test]
    fn gpu_link_rejects_resource_globals() {
        let Some(gpu) = headless() else { return };
        let fs_src = "
            struct T { color: vec4<f32> };
            @group(0) @binding(0) var<uniform> t: T;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return t.color;
            }
        ";
        let err = LinkedProgram::link(gpu.device(), "uniform", vec![vs(VS), fs(fs_src)])
            .err()
            .unwrap();
        assert_eq!(err.label, "uniform");
        assert!(err.log.starts_with("error: program declares resource `t`"));
    }

    #[test]
    fn gpu_link_reports_missing_device_features() {
        let Some(gpu) = headless() else { return };
        // the device is opened without SHADER_F16
        let fs_src = "
            enable f16;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                let h: f16 = 1.0h;
                return vec4<f32>(f32(h), 1.0, 0.0, 1.0);
            }
        ";
        let err = LinkedProgram::link(gpu.device(), "f16", vec![vs(VS), fs(fs_src)])
            .err()
            .unwrap();
        assert!(err.log.contains("device rejected shader module"));
    }

    #[test]
    fn gpu_link_succeeds_for_plain_program() {
        let Some(gpu) = headless() else { return };
        let program = LinkedProgram::link(gpu.device(), "triangle", vec![vs(VS), fs(FS)]).unwrap();
        assert_eq!(program.locate("aPosition"), Some(0));
    }
}
