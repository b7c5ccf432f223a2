//! Stormglass - an animated ocean vignette
//!
//! A wave-displaced ocean under a gradient sky, red rain falling through a
//! fixed pool of drops, a point light circling overhead and an optional prop
//! model orbiting the centre once it has loaded.

mod cli;

use std::sync::Arc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use cli::Args;
use stormglass::camera::OrbitCamera;
use stormglass::clock::{Clock, FixedStepClock, SystemClock};
use stormglass::error::AppError;
use stormglass::frame::{FrameDriver, Scene};
use stormglass::params::SceneConfig;
use stormglass::rendering::RenderSystem;

/// Pixels per wheel line for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f32 = 40.0;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation
    driver: FrameDriver<Box<dyn Clock>>,
    camera: OrbitCamera,

    // Configuration
    config: SceneConfig,

    // Orbit controls
    dragging: bool,
    last_cursor: Option<(f64, f64)>,

    /// Set when start-up fails inside the event loop
    error: Option<AppError>,
}

impl App {
    fn new(config: SceneConfig, driver: FrameDriver<Box<dyn Clock>>) -> Self {
        Self {
            window: None,
            render_system: None,
            driver,
            camera: OrbitCamera::new(&config.render),
            config,
            dragging: false,
            last_cursor: None,
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Stormglass")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.render.window_width,
                self.config.render.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, AppError::Window(e)),
        };

        let size = window.inner_size();
        self.camera.set_viewport(size.width, size.height);

        let scene = self.driver.scene();
        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &scene.grid,
            &scene.rain,
            &self.camera,
            self.config.sky.clone(),
            self.config.recording.clone(),
        ));
        let render_system = match render_system {
            Ok(render_system) => render_system,
            Err(e) => return self.fail(event_loop, AppError::Gpu(e)),
        };

        match &self.config.recording {
            Some(recording) => log::info!(
                "Recording {} frames to {}",
                recording.total_frames(),
                recording.frames_dir()
            ),
            None => log::info!("Drag to orbit, scroll to zoom, ESC to quit"),
        }

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.camera.set_viewport(size.width, size.height);
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
                if !self.dragging {
                    self.last_cursor = None;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.dragging {
                    if let Some((last_x, last_y)) = self.last_cursor {
                        self.camera
                            .rotate((position.x - last_x) as f32, (position.y - last_y) as f32);
                    }
                    self.last_cursor = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.camera.zoom(lines);
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }
}

impl App {
    /// Advance the scene one frame and draw it
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = &mut self.render_system else {
            return;
        };

        render_system.set_camera(&self.camera);

        match self.driver.tick(render_system) {
            Ok(_) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                render_system.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::warn!("Frame skipped: {:?}", e),
        }

        if let Some(recording) = &self.config.recording {
            let captured = render_system.frames_captured();
            if captured >= recording.total_frames() {
                log::info!("Recording complete: {} frames", captured);
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.scene_config();
    config.validate()?;

    if let Some(recording) = &config.recording {
        std::fs::create_dir_all(recording.frames_dir())?;
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let scene = Scene::new(&config, &mut rng)?;
    log::info!(
        "Scene: {}x{} ocean grid, {} rain drops",
        config.ocean.segments,
        config.ocean.segments,
        scene.rain.len()
    );

    // Recording advances exactly one frame per tick regardless of capture time
    let clock: Box<dyn Clock> = match &config.recording {
        Some(recording) => Box::new(FixedStepClock::new(recording.fps)),
        None => Box::new(SystemClock::new()),
    };

    let mut app = App::new(config, FrameDriver::new(clock, scene));
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
