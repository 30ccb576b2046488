//! Window and GPU shell around the scene core
//!
//! Owns the winit event loop. Translates window events into [`InputEvent`],
//! feeds finished textures to the GPU and runs one [`tick`] per redraw.

use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    assembly::{build_camera, build_scene, SceneConfig},
    context::{AppContext, Viewport},
    error::{Result, SceneError},
    gfx::{
        camera::{OrbitCamera, PointerButton, PointerEvent},
        resources::TextureLoader,
        scene::Scene,
        ui::UiManager,
        RenderEngine,
    },
    input::{handle_event, EventOutcome, InputEvent},
    performance::{render_overlay, PerformanceMetrics},
    render_loop::{tick, Rasterizer},
};

/// Scroll pixels treated as one wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// Startup options for [`run`]
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Initial window size in logical pixels
    pub window_size: (u32, u32),
    pub show_stats: bool,
    pub scene: SceneConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: (1200, 800),
            show_stats: true,
            scene: SceneConfig::default(),
        }
    }
}

/// Builds the scene, opens the window and runs until it closes.
///
/// Scene construction errors are returned before any window exists. A fatal
/// error during a frame stops the loop and is returned here.
pub fn run(config: AppConfig) -> Result<()> {
    let demo = build_scene(&config.scene)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let (width, height) = config.window_size;
    let viewport = Viewport::new(width, height);
    let ctx = AppContext::new(demo, build_camera(viewport), viewport);

    let mut app = SceneApp::new(ctx, config);
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct GpuState {
    window: Arc<Window>,
    engine: RenderEngine,
    ui: Option<UiManager>,
}

pub struct SceneApp {
    ctx: AppContext,
    config: AppConfig,
    textures: TextureLoader,
    gpu: Option<GpuState>,
    last_frame: Instant,
    fatal: Option<SceneError>,
}

impl SceneApp {
    fn new(ctx: AppContext, config: AppConfig) -> Self {
        let mut textures = TextureLoader::new();
        for path in ctx.scene.material_manager.texture_paths() {
            textures.request(path);
        }

        Self {
            ctx,
            config,
            textures,
            gpu: None,
            last_frame: Instant::now(),
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SceneError) {
        log::error!("{}", err);
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let (width, height) = self.config.window_size;
        let window = event_loop.create_window(
            WindowAttributes::default()
                .with_title("tinyscene")
                .with_inner_size(LogicalSize::new(width, height)),
        )?;
        let window = Arc::new(window);

        let PhysicalSize { width, height } = window.inner_size();
        let engine = pollster::block_on(RenderEngine::new(window.clone(), width, height))?;
        engine.prepare_scene(&mut self.ctx.scene);

        let ui = self.config.show_stats.then(|| {
            let mut ui = UiManager::new(
                engine.device(),
                engine.queue(),
                engine.surface_format(),
                &window,
            );
            ui.update_display_size(width, height);
            ui
        });

        handle_event(&mut self.ctx, InputEvent::Resized { width, height });
        self.gpu = Some(GpuState { window, engine, ui });
        self.last_frame = Instant::now();
        Ok(())
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: InputEvent) {
        match handle_event(&mut self.ctx, event) {
            EventOutcome::ViewportResized { width, height } => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.engine.resize(width, height);
                    if let Some(ui) = gpu.ui.as_mut() {
                        ui.update_display_size(width, height);
                    }
                }
            }
            EventOutcome::Exit => event_loop.exit(),
            EventOutcome::Handled | EventOutcome::Ignored => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        for (path, image) in self.textures.poll() {
            let bound = gpu.engine.upload_texture(&mut self.ctx.scene, &path, &image);
            log::debug!("Texture {} bound to {} material(s)", path.display(), bound);
        }

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        let mut target = FrameTarget {
            engine: &mut gpu.engine,
            ui: gpu.ui.as_mut(),
            window: &gpu.window,
            metrics: self.ctx.stats.get_metrics().clone(),
        };
        if let Err(err) = tick(&mut self.ctx, &mut target, dt) {
            self.fail(event_loop, err);
        }
    }
}

impl ApplicationHandler for SceneApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(err) = self.init_gpu(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        // Pointer input over the overlay stays with the overlay
        let ui_captured = match gpu.ui.as_mut() {
            Some(ui) => {
                let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                    window_id,
                    event: event.clone(),
                };
                ui.handle_input(&gpu.window, &ui_event)
            }
            None => false,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.dispatch(event_loop, InputEvent::Resized { width, height });
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if !ui_captured {
                    self.dispatch(event_loop, InputEvent::KeyDown(key_code));
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                let shift = modifiers.state().shift_key();
                self.dispatch(event_loop, InputEvent::Pointer(PointerEvent::Modifiers { shift }));
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                let pressed = state == ElementState::Pressed;
                // Releases always go through so a drag never sticks
                if !pressed || !ui_captured {
                    self.dispatch(
                        event_loop,
                        InputEvent::Pointer(PointerEvent::Button { button, pressed }),
                    );
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !ui_captured => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                self.dispatch(
                    event_loop,
                    InputEvent::Pointer(PointerEvent::Wheel { delta: -lines }),
                );
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        let DeviceEvent::MouseMotion { delta } = event else {
            return;
        };
        let over_ui = self
            .gpu
            .as_ref()
            .and_then(|gpu| gpu.ui.as_ref())
            .is_some_and(UiManager::wants_pointer);
        if over_ui {
            return;
        }

        self.dispatch(
            event_loop,
            InputEvent::Pointer(PointerEvent::Moved {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            }),
        );
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = self.gpu.as_ref() {
            gpu.window.request_redraw();
        }
    }
}

/// The engine plus the overlay for one frame
struct FrameTarget<'a> {
    engine: &'a mut RenderEngine,
    ui: Option<&'a mut UiManager>,
    window: &'a Window,
    metrics: PerformanceMetrics,
}

impl Rasterizer for FrameTarget<'_> {
    fn render(&mut self, scene: &Scene, camera: &OrbitCamera) -> Result<()> {
        let Some(ui) = self.ui.as_deref_mut() else {
            return self.engine.render(scene, camera);
        };
        let window = self.window;
        let metrics = &self.metrics;

        self.engine.render_frame(
            scene,
            camera.uniform,
            camera.eye,
            Some(
                |device: &wgpu::Device,
                 queue: &wgpu::Queue,
                 encoder: &mut wgpu::CommandEncoder,
                 view: &wgpu::TextureView| {
                    ui.draw(device, queue, encoder, window, view, |frame| {
                        render_overlay(frame, metrics)
                    });
                },
            ),
        )
    }
}
