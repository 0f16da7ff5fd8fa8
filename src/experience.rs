//! The interactive window.
//!
//! [`Experience`] is the entry point: configure it, then call
//! [`run`](Experience::run), which blocks until the window is closed.
//!
//! ```ignore
//! Experience::new()
//!     .with_seed(7)
//!     .with_initial_state(TreeState::Formed)
//!     .run()?;
//! ```

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowId};

use crate::config::TreeConfig;
use crate::error::{AppError, ConfigError};
use crate::gpu::GpuState;
use crate::input::Input;
use crate::scene::TreeScene;
use crate::state::TreeState;
use crate::time::Time;

/// Radians of orbit per pixel of drag.
const ORBIT_SENSITIVITY: f32 = 0.005;
/// World units of zoom per wheel line.
const ZOOM_SENSITIVITY: f32 = 1.0;
/// Frames between title refreshes.
const TITLE_INTERVAL: u64 = 30;

/// Builder and runner for the tree window.
pub struct Experience {
    config: TreeConfig,
    initial_state: TreeState,
    fixed_step: Option<f32>,
}

impl Experience {
    /// Default scene, starting in [`TreeState::Chaos`].
    pub fn new() -> Self {
        Self {
            config: TreeConfig::default(),
            initial_state: TreeState::Chaos,
            fixed_step: None,
        }
    }

    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the random layout.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// State to open in. Every record starts at rest there.
    pub fn with_initial_state(mut self, state: TreeState) -> Self {
        self.initial_state = state;
        self
    }

    /// Override the number of foliage points.
    pub fn with_foliage_count(mut self, count: u32) -> Self {
        self.config.foliage_count = count;
        self
    }

    /// Advance every frame by `step` seconds instead of wall-clock time,
    /// so screen captures replay the same animation.
    pub fn with_fixed_step(mut self, step: f32) -> Self {
        self.fixed_step = Some(step);
        self
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Validate the config and sample every dataset.
    pub fn build_scene(&self) -> Result<TreeScene, AppError> {
        self.config.validate()?;
        if let Some(step) = self.fixed_step {
            if !(step.is_finite() && step > 0.0) {
                return Err(ConfigError::Invalid {
                    field: "fixed_step",
                    reason: "must be a positive finite number",
                }
                .into());
            }
        }
        Ok(TreeScene::new(self.config.clone(), self.initial_state))
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), AppError> {
        let scene = self.build_scene()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut time = Time::new();
        if let Some(step) = self.fixed_step {
            log::info!("Using a fixed step of {}s per frame", step);
            time = time.with_fixed_step(step);
        }

        let mut app = App::new(scene, self.initial_state, time);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Experience {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    scene: TreeScene,
    state: TreeState,
    input: Input,
    time: Time,
    /// First fatal error; reported by `Experience::run` after the loop exits.
    error: Option<AppError>,
}

impl App {
    fn new(scene: TreeScene, state: TreeState, time: Time) -> Self {
        Self {
            window: None,
            gpu_state: None,
            scene,
            state,
            input: Input::new(),
            time,
            error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title(title(self.state, None))
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());
        self.gpu_state = Some(pollster::block_on(GpuState::new(window, &self.scene))?);
        Ok(())
    }

    fn toggle(&mut self) {
        self.state = self.state.toggled();
        log::info!("Heading to {:?}", self.state);
        self.refresh_title();
    }

    fn refresh_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&title(self.state, Some(self.time.fps())));
        }
    }

    /// Apply this frame's input, advance the scene and draw it.
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (elapsed, delta) = self.time.update();

        if self.input.key_pressed(KeyCode::Space)
            || self.input.key_pressed(KeyCode::Enter)
            || self.input.clicked()
        {
            self.toggle();
        }
        if self.input.key_pressed(KeyCode::Escape) {
            event_loop.exit();
            return;
        }

        self.scene.tick(self.state, delta, elapsed);

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        let drag = self.input.drag_delta();
        gpu_state
            .camera
            .orbit(drag.x * ORBIT_SENSITIVITY, drag.y * ORBIT_SENSITIVITY);
        gpu_state.camera.zoom(self.input.scroll_delta() * ZOOM_SENSITIVITY);
        if self.state == TreeState::Formed {
            gpu_state.camera.auto_rotate(delta);
        }

        match gpu_state.render(&self.scene, elapsed) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }

        self.input.begin_frame();
        if self.time.frame() % TITLE_INTERVAL == 0 {
            self.refresh_title();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::Occluded(hidden) => {
                if hidden != self.time.is_paused() {
                    log::debug!("Window {}", if hidden { "hidden, pausing" } else { "visible, resuming" });
                }
                if hidden {
                    self.time.pause();
                } else {
                    self.time.resume();
                }
            }
            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn title(state: TreeState, fps: Option<f32>) -> String {
    match fps {
        Some(fps) if fps > 0.0 => format!("morphtree - {} ({:.0} fps)", state.action_label(), fps),
        _ => format!("morphtree - {}", state.action_label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_shows_next_action() {
        assert_eq!(title(TreeState::Chaos, None), "morphtree - Assemble");
        assert_eq!(title(TreeState::Formed, Some(59.6)), "morphtree - Scatter (60 fps)");
        assert_eq!(title(TreeState::Formed, Some(0.0)), "morphtree - Scatter");
    }

    #[test]
    fn test_build_scene_validates_config() {
        let experience = Experience::new().with_foliage_count(0);
        assert!(matches!(experience.build_scene(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_build_scene_rejects_bad_fixed_step() {
        let experience = Experience::new().with_foliage_count(100).with_fixed_step(0.0);
        assert!(matches!(
            experience.build_scene(),
            Err(AppError::Config(ConfigError::Invalid { field: "fixed_step", .. }))
        ));
    }

    #[test]
    fn test_build_scene_starts_at_rest() {
        let scene = Experience::new()
            .with_config(TreeConfig {
                foliage_count: 100,
                bauble_count: 10,
                gift_count: 5,
                ..Default::default()
            })
            .with_seed(1)
            .with_initial_state(TreeState::Formed)
            .build_scene()
            .unwrap();
        assert!(scene.is_settled(TreeState::Formed));
        assert_eq!(scene.config().seed, Some(1));
    }
}
