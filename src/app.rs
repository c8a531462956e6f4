//! Viewer state and toggles
//!
//! Everything that changes between frames lives here and is handed to the renderer explicitly.

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::rasterizer::{Color, Mat4, RasterOptions};

fn on_off(enabled: bool) -> &'static str {
    if enabled { "ON" } else { "OFF" }
}

/// Main viewer state
pub struct AppState {
    pub camera: Camera,
    pub options: RasterOptions,

    /// Accumulated world rotation around Y (radians)
    pub rotation: f32,
    pub rotation_speed: f32,
    pub rotation_enabled: bool,

    pub clear_color: Color,
    pub uniform_clear_color: Color,
    pub use_uniform_clear_color: bool,

    pub print_fps: bool,
    fps_timer: f32,
}

impl AppState {
    pub fn new(config: &RenderConfig) -> Self {
        let mut camera = Camera::new(config.fov_degrees, config.camera_origin);
        camera.near = config.near;
        camera.far = config.far;

        Self {
            camera,
            options: config.options,
            rotation: 0.0,
            rotation_speed: config.rotation_speed,
            rotation_enabled: config.rotate,
            clear_color: config.clear_color,
            uniform_clear_color: config.uniform_clear_color,
            use_uniform_clear_color: false,
            print_fps: false,
            fps_timer: 0.0,
        }
    }

    /// Advance time-based state. Returns true when an FPS line is due.
    pub fn update(&mut self, dt: f32) -> bool {
        if self.rotation_enabled {
            self.rotation += self.rotation_speed * dt;
        }

        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps_timer = 0.0;
            return self.print_fps;
        }
        false
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::rotation_y(self.rotation)
    }

    pub fn current_clear_color(&self) -> Color {
        if self.use_uniform_clear_color {
            self.uniform_clear_color
        } else {
            self.clear_color
        }
    }

    pub fn toggle_rotation(&mut self) {
        self.rotation_enabled = !self.rotation_enabled;
        log::info!("Rotation: {}", on_off(self.rotation_enabled));
    }

    pub fn toggle_depth_buffer(&mut self) {
        self.options.show_depth_buffer = !self.options.show_depth_buffer;
        log::info!("Depth buffer visualisation: {}", on_off(self.options.show_depth_buffer));
    }

    pub fn toggle_bounding_boxes(&mut self) {
        self.options.show_bounding_boxes = !self.options.show_bounding_boxes;
        log::info!("Bounding box visualisation: {}", on_off(self.options.show_bounding_boxes));
    }

    pub fn cycle_cull_mode(&mut self) {
        self.options.cull_mode = self.options.cull_mode.next();
        log::info!("Cull mode: {}", self.options.cull_mode.label());
    }

    pub fn toggle_uniform_clear_color(&mut self) {
        self.use_uniform_clear_color = !self.use_uniform_clear_color;
        log::info!("Uniform clear color: {}", on_off(self.use_uniform_clear_color));
    }

    pub fn toggle_print_fps(&mut self) {
        self.print_fps = !self.print_fps;
        log::info!("Print FPS: {}", on_off(self.print_fps));
    }
}

/// Key bindings, logged at startup
pub const CONTROLS: &[&str] = &[
    "[F2]  Toggle rotation (ON/OFF)",
    "[F7]  Toggle depth buffer visualisation (ON/OFF)",
    "[F8]  Toggle bounding box visualisation (ON/OFF)",
    "[F9]  Cycle cull mode (NONE/BACK/FRONT)",
    "[F10] Toggle uniform clear color (ON/OFF)",
    "[F11] Toggle print FPS (ON/OFF)",
    "[WASD] Move, [Right mouse] Look, [Left/Right] FOV",
];
