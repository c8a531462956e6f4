//! Free-look camera producing view and projection matrices

use crate::rasterizer::{Mat4, Vec3};

const MIN_FOV: f32 = 20.0;
const MAX_FOV: f32 = 150.0;
const FOV_STEP: f32 = 5.0;

/// Camera state
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Vec3,
    pub fov_degrees: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov_degrees: f32, origin: Vec3) -> Self {
        Self {
            origin,
            fov_degrees,
            pitch: 0.0,
            yaw: 0.0,
            near: 1.0,
            far: 1000.0,
        }
    }

    /// Forward direction from pitch (around X) then yaw (around Y)
    pub fn forward(&self) -> Vec3 {
        let rotation = Mat4::rotation_y(self.yaw) * Mat4::rotation_x(self.pitch);
        rotation.transform_vector(Vec3::FORWARD).normalize()
    }

    pub fn right(&self) -> Vec3 {
        Vec3::UP.cross(self.forward()).normalize()
    }

    pub fn up(&self) -> Vec3 {
        let forward = self.forward();
        forward.cross(Vec3::UP.cross(forward).normalize())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_lh(self.origin, self.forward(), Vec3::UP)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_lh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    /// Add to pitch and yaw (radians). Pitch stays short of straight up/down.
    pub fn rotate(&mut self, d_pitch: f32, d_yaw: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.01,
            std::f32::consts::FRAC_PI_2 - 0.01,
        );
    }

    /// Move along the camera's own axes
    pub fn move_local(&mut self, forward: f32, right: f32, up: f32) {
        self.origin = self.origin + self.forward() * forward + self.right() * right + self.up() * up;
    }

    /// Step the field of view in or out, staying within 20..=150 degrees
    pub fn zoom(&mut self, steps: i32) {
        self.fov_degrees = (self.fov_degrees + steps as f32 * FOV_STEP).clamp(MIN_FOV, MAX_FOV);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(45.0, Vec3::new(0.0, 0.0, -50.0))
    }
}
