use crate::core::{Keyboard, Scene, WindowControl};
use crate::paint::Color;
use crate::render::{DrawCall, Mesh, RenderCtx, RenderTarget};
use crate::shader::{compile, LinkedProgram};

use super::config::SceneConfig;
use super::error::SceneError;
use super::exit::ExitKey;

/// Lifecycle phase of a [`TriangleScene`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ScenePhase {
    Uninitialized,
    Ready,
    Disposed,
}

/// GPU resources owned by a ready scene. Dropping them releases them.
struct Resources {
    mesh: Mesh,
    program: LinkedProgram,
}

enum State {
    Uninitialized,
    Ready(Resources),
    Disposed,
}

/// One linked program, one static mesh, one draw per frame.
pub struct TriangleScene {
    config: SceneConfig,
    exit: ExitKey,
    state: State,
    last_draw: Option<DrawCall>,
}

impl TriangleScene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            exit: ExitKey::new(config.exit_key),
            config,
            state: State::Uninitialized,
            last_draw: None,
        }
    }

    pub fn phase(&self) -> ScenePhase {
        match self.state {
            State::Uninitialized => ScenePhase::Uninitialized,
            State::Ready(_) => ScenePhase::Ready,
            State::Disposed => ScenePhase::Disposed,
        }
    }

    pub fn clear_color(&self) -> Color {
        self.config.clear_color
    }

    /// The draw recorded by the most recent `draw`, `None` if it recorded nothing.
    pub fn last_draw(&self) -> Option<DrawCall> {
        self.last_draw
    }

    pub fn program(&self) -> Option<&LinkedProgram> {
        match &self.state {
            State::Ready(res) => Some(&res.program),
            _ => None,
        }
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        match &self.state {
            State::Ready(res) => Some(&res.mesh),
            _ => None,
        }
    }

    /// Compile → link → mesh, strictly in that order.
    fn build(&self, ctx: &RenderCtx<'_>) -> Result<Resources, SceneError> {
        let vertex = compile(&self.config.vertex_source)?;
        let fragment = compile(&self.config.fragment_source)?;

        let program = LinkedProgram::link(ctx.device, "triangle program", vec![vertex, fragment])?;
        let mesh = Mesh::build(ctx.device, &program, ctx.target_format, &self.config.positions)?;

        Ok(Resources { mesh, program })
    }
}

impl Default for TriangleScene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene for TriangleScene {
    type Error = SceneError;

    fn init(&mut self, ctx: &RenderCtx<'_>) -> Result<(), SceneError> {
        if !matches!(self.state, State::Uninitialized) {
            return Err(SceneError::AlreadyInitialized);
        }

        // Nothing becomes visible unless the whole pipeline succeeded.
        let resources = self.build(ctx)?;
        self.state = State::Ready(resources);

        log::info!(
            "triangle scene ready ({} vertices, clear {:?})",
            self.config.positions.len(),
            self.config.clear_color
        );
        Ok(())
    }

    fn update(&mut self, _secs: f32, keyboard: &dyn Keyboard, window: &mut dyn WindowControl) {
        self.exit.poll(keyboard, window);
    }

    fn draw(&mut self, _ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        let State::Ready(res) = &self.state else {
            self.last_draw = None;
            return;
        };

        let mut pass = target.clear_pass("trigon triangle pass", self.config.clear_color);
        self.last_draw = Some(res.mesh.record(&mut pass));
        drop(pass);
    }

    fn deinit(&mut self) {
        if let State::Ready(_) = std::mem::replace(&mut self.state, State::Disposed) {
            log::debug!("triangle scene released GPU resources");
        }
        self.last_draw = None;
    }
}
