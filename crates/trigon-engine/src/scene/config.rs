use crate::input::Key;
use crate::paint::Color;
use crate::shader::ShaderSource;

/// Passes a 2D clip-space position straight through.
pub const TRIANGLE_VERTEX_SHADER: &str = r#"
@vertex
fn vs_main(@location(0) aPosition: vec2<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(aPosition, 0.0, 1.0);
}
"#;

/// Constant opaque yellow.
pub const TRIANGLE_FRAGMENT_SHADER: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 1.0, 0.0, 1.0);
}
"#;

pub const TRIANGLE_POSITIONS: [[f32; 2]; 3] = [
    [0.0, 0.5],
    [-0.5, -0.5],
    [0.5, -0.5],
];

/// Everything `TriangleScene` needs to build itself.
///
/// `Default` is the canonical triangle: black background, yellow fill, Escape exits.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub clear_color: Color,
    pub exit_key: Key,
    pub positions: Vec<[f32; 2]>,
    pub vertex_source: ShaderSource,
    pub fragment_source: ShaderSource,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::BLACK,
            exit_key: Key::Escape,
            positions: TRIANGLE_POSITIONS.to_vec(),
            vertex_source: ShaderSource::vertex("triangle vs", TRIANGLE_VERTEX_SHADER),
            fragment_source: ShaderSource::fragment("triangle fs", TRIANGLE_FRAGMENT_SHADER),
        }
    }
}

impl SceneConfig {
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_exit_key(mut self, key: Key) -> Self {
        self.exit_key = key;
        self
    }

    pub fn with_positions(mut self, positions: impl Into<Vec<[f32; 2]>>) -> Self {
        self.positions = positions.into();
        self
    }

    pub fn with_shaders(mut self, vertex: ShaderSource, fragment: ShaderSource) -> Self {
        self.vertex_source = vertex;
        self.fragment_source = fragment;
        self
    }
}
