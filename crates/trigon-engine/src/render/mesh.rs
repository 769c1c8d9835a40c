use std::ops::Range;

use thiserror::Error;
use wgpu::util::DeviceExt;

use crate::shader::{LinkedProgram, ProgramInterface, ScalarKind, ValueType};

/// Vertex shader input the mesh feeds its positions into.
pub const POSITION_ATTRIBUTE: &str = "aPosition";

/// Mesh construction failures.
///
/// All of these are integration errors between the vertex shader and the
/// binding below; none is retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("mesh has no vertices")]
    Empty,

    #[error("attribute `{attribute}` not found in program `{program}`")]
    AttributeNotFound { attribute: String, program: String },

    #[error("attribute `{attribute}` is declared as {found}, expected vec2<f32>")]
    AttributeFormat { attribute: String, found: ValueType },

    #[error("vertex input `{attribute}` at location {location} is not fed by the mesh")]
    UnboundAttribute { attribute: String, location: u32 },

    #[error("render pipeline for program `{program}` was rejected:\n{log}")]
    Pipeline { program: String, log: String },
}

/// Primitive interpretation of the vertex stream.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
}

impl PrimitiveTopology {
    pub(crate) fn to_wgpu(self) -> wgpu::PrimitiveTopology {
        match self {
            PrimitiveTopology::PointList => wgpu::PrimitiveTopology::PointList,
            PrimitiveTopology::LineList => wgpu::PrimitiveTopology::LineList,
            PrimitiveTopology::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            PrimitiveTopology::TriangleList => wgpu::PrimitiveTopology::TriangleList,
            PrimitiveTopology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ComponentType {
    Float,
}

/// Association of a named shader input with the mesh's vertex buffer.
///
/// `stride == 0` means tightly packed: the effective stride is the attribute size.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct AttributeBinding {
    pub name: String,
    pub location: u32,
    pub components: u32,
    pub component_type: ComponentType,
    pub normalized: bool,
    pub stride: u64,
    pub offset: u64,
}

impl AttributeBinding {
    /// Tightly packed, non-normalized float positions.
    fn positions(name: &str, location: u32) -> Self {
        Self {
            name: name.to_string(),
            location,
            components: 2,
            component_type: ComponentType::Float,
            normalized: false,
            stride: 0,
            offset: 0,
        }
    }

    pub fn vertex_format(&self) -> wgpu::VertexFormat {
        match (self.component_type, self.components) {
            (ComponentType::Float, 1) => wgpu::VertexFormat::Float32,
            (ComponentType::Float, 2) => wgpu::VertexFormat::Float32x2,
            (ComponentType::Float, 3) => wgpu::VertexFormat::Float32x3,
            (ComponentType::Float, _) => wgpu::VertexFormat::Float32x4,
        }
    }

    /// Byte distance between consecutive vertices.
    pub fn array_stride(&self) -> u64 {
        if self.stride == 0 {
            self.vertex_format().size()
        } else {
            self.stride
        }
    }

    fn to_wgpu(&self) -> wgpu::VertexAttribute {
        wgpu::VertexAttribute {
            format: self.vertex_format(),
            offset: self.offset,
            shader_location: self.location,
        }
    }
}

/// Parameters of the single draw a mesh issues per frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawCall {
    pub topology: PrimitiveTopology,
    pub first_vertex: u32,
    pub vertex_count: u32,
}

impl DrawCall {
    pub fn vertices(&self) -> Range<u32> {
        self.first_vertex..self.first_vertex + self.vertex_count
    }
}

/// CPU-side mesh description: the resolved binding plus draw sizing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MeshLayout {
    binding: AttributeBinding,
    vertex_count: u32,
    topology: PrimitiveTopology,
}

impl MeshLayout {
    /// Resolves the position binding against `program` for `vertex_count` vertices.
    pub fn resolve(program: &ProgramInterface, vertex_count: usize) -> Result<Self, MeshError> {
        if vertex_count == 0 {
            return Err(MeshError::Empty);
        }

        let attribute = program.attribute(POSITION_ATTRIBUTE).ok_or_else(|| {
            MeshError::AttributeNotFound {
                attribute: POSITION_ATTRIBUTE.to_string(),
                program: program.label().to_string(),
            }
        })?;

        let expected = ValueType::Vector { size: 2, kind: ScalarKind::Float };
        if attribute.ty != expected {
            return Err(MeshError::AttributeFormat {
                attribute: POSITION_ATTRIBUTE.to_string(),
                found: attribute.ty,
            });
        }

        // No default attribute values under wgpu: every declared input needs a feed.
        if let Some(unfed) = program.attributes().iter().find(|a| a.location != attribute.location) {
            return Err(MeshError::UnboundAttribute {
                attribute: unfed.display_name().to_string(),
                location: unfed.location,
            });
        }

        Ok(Self {
            binding: AttributeBinding::positions(POSITION_ATTRIBUTE, attribute.location),
            vertex_count: vertex_count as u32,
            topology: PrimitiveTopology::TriangleList,
        })
    }

    pub fn binding(&self) -> &AttributeBinding {
        &self.binding
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn draw_call(&self) -> DrawCall {
        DrawCall {
            topology: self.topology,
            first_vertex: 0,
            vertex_count: self.vertex_count,
        }
    }
}

/// Immutable vertex buffer plus its binding container.
///
/// The binding container is a render pipeline with the attribute layout baked
/// in; it is only valid for the program it was built against.
pub struct Mesh {
    layout: MeshLayout,
    buffer: wgpu::Buffer,
    pipeline: wgpu::RenderPipeline,
}

impl Mesh {
    /// Uploads `positions` and binds them to the program's position attribute.
    ///
    /// Nothing stays bound afterwards: bindings only exist inside a render pass.
    pub fn build(
        device: &wgpu::Device,
        program: &LinkedProgram,
        target_format: wgpu::TextureFormat,
        positions: &[[f32; 2]],
    ) -> Result<Self, MeshError> {
        let layout = MeshLayout::resolve(program.interface(), positions.len())?;

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon mesh positions"),
            contents: bytemuck::cast_slice(positions),
            // No COPY_DST: contents are fixed for the buffer's lifetime.
            usage: wgpu::BufferUsages::VERTEX,
        });

        let attributes = [layout.binding.to_wgpu()];
        let buffers = [wgpu::VertexBufferLayout {
            array_stride: layout.binding.array_stride(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        }];

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label()),
            layout: Some(program.layout()),

            vertex: wgpu::VertexState {
                module: program.vertex_module(),
                entry_point: Some(program.interface().vertex_entry()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },

            fragment: Some(wgpu::FragmentState {
                module: program.fragment_module(),
                entry_point: Some(program.interface().fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: layout.topology.to_wgpu(),
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(MeshError::Pipeline {
                program: program.label().to_string(),
                log: err.to_string(),
            });
        }

        log::debug!(
            "built mesh: {} vertices, `{}` at location {}",
            layout.vertex_count,
            layout.binding.name,
            layout.binding.location
        );

        Ok(Self {
            layout,
            buffer,
            pipeline,
        })
    }

    pub fn layout(&self) -> &MeshLayout {
        &self.layout
    }

    pub fn draw_call(&self) -> DrawCall {
        self.layout.draw_call()
    }

    /// Binds container + buffer on `pass` and issues exactly one draw.
    ///
    /// Returns the draw that was recorded.
    pub fn record(&self, pass: &mut wgpu::RenderPass<'_>) -> DrawCall {
        let call = self.draw_call();
        pass.set_pipeline(&self.pipeline);
        pass.set_vertex_buffer(0, self.buffer.slice(..));
        pass.draw(call.vertices(), 0..1);
        call
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GpuInit, Headless};
    use crate::shader::{compile, ShaderSource};

    const FS: &str = "
        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return vec4<f32>(1.0, 1.0, 0.0, 1.0);
        }
    ";

    fn program(vs_src: &'static str) -> ProgramInterface {
        let vs = compile(&ShaderSource::vertex("vs", vs_src)).unwrap();
        let fs = compile(&ShaderSource::fragment("fs", FS)).unwrap();
        ProgramInterface::link("test program", &[vs, fs]).unwrap()
    }

    #[test]
    fn resolves_position_binding() {
        let p = program(
            "@vertex fn vs_main(@location(0) aPosition: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(aPosition, 0.0, 1.0);
            }",
        );
        let layout = MeshLayout::resolve(&p, 3).unwrap();
        let b = layout.binding();

        assert_eq!(b.name, POSITION_ATTRIBUTE);
        assert_eq!(b.location, 0);
        assert_eq!(b.components, 2);
        assert_eq!(b.component_type, ComponentType::Float);
        assert!(!b.normalized);
        assert_eq!((b.stride, b.offset), (0, 0));
        assert_eq!(b.vertex_format(), wgpu::VertexFormat::Float32x2);
        assert_eq!(b.array_stride(), 8);
    }

    #[test]
    fn location_comes_from_the_program() {
        let p = program(
            "@vertex fn vs_main(@location(5) aPosition: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(aPosition, 0.0, 1.0);
            }",
        );
        assert_eq!(MeshLayout::resolve(&p, 1).unwrap().binding().location, 5);
    }

    #[test]
    fn draw_call_covers_every_vertex_from_zero() {
        let p = program(
            "@vertex fn vs_main(@location(0) aPosition: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(aPosition, 0.0, 1.0);
            }",
        );
        for n in [1usize, 3, 6, 300] {
            let call = MeshLayout::resolve(&p, n).unwrap().draw_call();
            assert_eq!(call.topology, PrimitiveTopology::TriangleList);
            assert_eq!(call.vertices(), 0..n as u32);
        }
    }

    #[test]
    fn missing_attribute_is_reported_with_program() {
        let p = program(
            "@vertex fn vs_main(@location(0) pos: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(pos, 0.0, 1.0);
            }",
        );
        assert_eq!(
            MeshLayout::resolve(&p, 3).unwrap_err(),
            MeshError::AttributeNotFound {
                attribute: "aPosition".to_string(),
                program: "test program".to_string(),
            }
        );
    }

    #[test]
    fn wrong_attribute_shape_is_rejected() {
        let p = program(
            "@vertex fn vs_main(@location(0) aPosition: vec3<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(aPosition, 1.0);
            }",
        );
        let err = MeshLayout::resolve(&p, 3).unwrap_err();
        assert!(matches!(err, MeshError::AttributeFormat { .. }));
        assert!(err.to_string().contains("vec3<f32>"));
    }

    #[test]
    fn extra_inputs_must_be_fed() {
        let p = program(
            "@vertex fn vs_main(@location(0) aPosition: vec2<f32>, @location(1) aColor: vec3<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(aPosition + aColor.xy, 0.0, 1.0);
            }",
        );
        assert_eq!(
            MeshLayout::resolve(&p, 3).unwrap_err(),
            MeshError::UnboundAttribute { attribute: "aColor".to_string(), location: 1 }
        );
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let p = program(
            "@vertex fn vs_main(@location(0) aPosition: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(aPosition, 0.0, 1.0);
            }",
        );
        assert_eq!(MeshLayout::resolve(&p, 0).unwrap_err(), MeshError::Empty);
    }

    #[test]
    fn rejected_pipeline_is_an_error() {
        let gpu = match Headless::request(&GpuInit::default()) {
            Ok(gpu) => gpu,
            Err(e) => {
                eprintln!("no GPU adapter available, skipping: {e:#}");
                return;
            }
        };
        let vs = compile(&ShaderSource::vertex(
            "vs",
            "@vertex fn vs_main(@location(0) aPosition: vec2<f32>) -> @builtin(position) vec4<f32> {
                return vec4<f32>(aPosition, 0.0, 1.0);
            }",
        ))
        .unwrap();
        let fs = compile(&ShaderSource::fragment("fs", FS)).unwrap();
        let program = LinkedProgram::link(gpu.device(), "depth target", vec![vs, fs]).unwrap();

        // a depth format cannot be a colour target
        let result = Mesh::build(
            gpu.device(),
            &program,
            wgpu::TextureFormat::Depth32Float,
            &[[0.0, 0.5], [-0.5, -0.5], [0.5, -0.5]],
        );
        match result {
            Err(MeshError::Pipeline { program, log }) => {
                assert_eq!(program, "depth target");
                assert!(!log.is_empty());
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("depth format accepted as colour target"),
        }
    }
}
