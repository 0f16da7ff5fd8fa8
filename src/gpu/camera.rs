//! Orbit camera around the tree.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

/// Closest and farthest orbit distance.
pub const MIN_DISTANCE: f32 = 10.0;
pub const MAX_DISTANCE: f32 = 40.0;

/// Orbit angle above the horizon. The lower bound is a polar angle of
/// `PI / 1.5` from straight up; the upper one stops short of the pole.
const MIN_PITCH: f32 = PI / 2.0 - PI / 1.5;
const MAX_PITCH: f32 = 1.5;

/// Seconds per full turn at auto-rotate speed 1.
const ROTATE_PERIOD: f32 = 60.0;

/// Orbit camera with clamped zoom and elevation.
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    pub fov_y: f32,
    /// Turns per minute while auto-rotating.
    pub auto_rotate_speed: f32,
}

impl Camera {
    /// Camera at world position (0, 4, 25), looking at the origin.
    pub fn new() -> Self {
        let eye = Vec3::new(0.0, 4.0, 25.0);
        Self {
            yaw: 0.0,
            pitch: eye.y.atan2(eye.z),
            distance: eye.length(),
            target: Vec3::ZERO,
            fov_y: 45.0_f32.to_radians(),
            auto_rotate_speed: 0.5,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, 0.1, 200.0)
    }

    /// Rotate by a mouse drag, in radians.
    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw -= d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(MIN_PITCH, MAX_PITCH);
    }

    /// Move closer (positive) or farther (negative).
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Spin slowly around the vertical axis.
    pub fn auto_rotate(&mut self, delta: f32) {
        self.yaw = (self.yaw + TAU / ROTATE_PERIOD * self.auto_rotate_speed * delta) % TAU;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_front() {
        let camera = Camera::new();
        let p = camera.position();
        assert!((p - Vec3::new(0.0, 4.0, 25.0)).length() < 1e-4);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new();
        camera.zoom(100.0);
        assert_eq!(camera.distance, MIN_DISTANCE);
        camera.zoom(-100.0);
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::new();
        camera.orbit(0.0, 10.0);
        assert!(camera.pitch < PI / 2.0);
        camera.orbit(0.0, -10.0);
        assert_eq!(camera.pitch, MIN_PITCH);
    }

    #[test]
    fn test_auto_rotate_half_turn_per_minute() {
        let mut camera = Camera::new();
        for _ in 0..600 {
            camera.auto_rotate(0.1);
        }
        assert!((camera.yaw - PI).abs() < 1e-3);
    }
}
