use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{Scene, WindowControl};
use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::input::platform::winit::translate_window_event;
use crate::input::{InputFrame, InputState, KeyboardView};
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "trigon".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Commands a scene issues during `update`.
///
/// Buffered and applied after the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    fn close_window(&mut self) {
        self.commands.push(Command::CloseWindow);
    }

    fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    fn stops_frame(&self) -> bool {
        !self.commands.is_empty()
    }
}

impl WindowControl for RuntimeCtx {
    fn request_close(&mut self) {
        self.close_window();
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Command {
    CloseWindow,
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, initializes `scene` against its device and runs the
    /// frame loop until the window closes.
    ///
    /// A scene init failure ends the loop and is returned here.
    pub fn run<S>(config: RuntimeConfig, gpu_init: GpuInit, scene: S) -> Result<()>
    where
        S: Scene + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, scene);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<S>
where
    S: Scene + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    scene: S,

    window: Option<WindowEntry>,
    started: bool,
    failure: Option<anyhow::Error>,
}

impl<S> AppState<S>
where
    S: Scene + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, scene: S) -> Self {
        Self {
            config,
            gpu_init,
            scene,
            window: None,
            started: false,
            failure: None,
        }
    }

    fn create_window_entry(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        WindowEntryTryBuilder {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
    }

    /// Window + device, then scene init. Any failure is fatal.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let entry = self.create_window_entry(event_loop)?;

        let scene = &mut self.scene;
        entry
            .with_gpu(|gpu| {
                let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
                scene.init(&ctx)
            })
            .map_err(anyhow::Error::new)
            .context("scene initialization failed")?;

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.shutdown(event_loop);
    }

    /// Tears the scene down before the device and window go away.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.scene.deinit();
        if self.window.take().is_some() {
            log::debug!("window closed");
        }
        event_loop.exit();
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx) {
        for cmd in ctx.commands {
            match cmd {
                Command::CloseWindow | Command::Exit => {
                    self.shutdown(event_loop);
                    return;
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        // Split borrows to keep `self` out of the `ouroboros` closure.
        let (scene, window) = (&mut self.scene, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };

        let mut runtime_ctx = RuntimeCtx::default();
        let mut fatal = false;

        entry.with_mut(|fields| {
            let ft = fields.clock.tick();

            {
                let keyboard = KeyboardView::new(fields.input_state, fields.input_frame);
                scene.update(ft.dt, &keyboard, &mut runtime_ctx);
            }
            fields.input_frame.clear();

            // A closing window does not present another frame.
            if runtime_ctx.stops_frame() {
                return;
            }

            let gpu = fields.gpu;
            match gpu.begin_frame() {
                Ok(mut frame) => {
                    {
                        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format());
                        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
                        scene.draw(&ctx, &mut target);
                    }
                    fields.window.pre_present_notify();
                    gpu.submit(frame);
                }
                Err(err) => {
                    let reason = err.to_string();
                    match gpu.handle_surface_error(err) {
                        SurfaceErrorAction::Fatal => {
                            log::error!("surface error is fatal: {reason}");
                            fatal = true;
                        }
                        action => log::warn!("frame {} skipped ({reason}): {action:?}", ft.frame_index),
                    }
                }
            }
        });

        if fatal {
            runtime_ctx.exit();
        }
        self.apply_commands(event_loop, runtime_ctx);
    }
}

impl<S> ApplicationHandler for AppState<S>
where
    S: Scene + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw: one update/draw pair per vsync.
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(entry) = self.window.as_mut() else {
            return;
        };

        entry.with_mut(|fields| {
            if let Some(ev) = translate_window_event(&event) {
                fields.input_state.apply_event(fields.input_frame, ev);
            }
        });

        match &event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                entry.with_window(|w| w.request_redraw());
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.scene.deinit();
    }
}
