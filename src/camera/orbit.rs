use glam::{Quat, Vec2, Vec3};

use crate::camera::core::Camera;

/// Zoom distance clamp (world units).
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 6.0;

/// Continuous auto-rotation rate in radians/second (one orbit every ~22 s).
const AUTO_ROTATE_SPEED: f32 = 0.288;

/// Fraction of angular velocity retained per frame after a drag ends.
const DAMPING_RETAIN: f32 = 0.92;

/// Keep pitch away from the poles so the up vector never flips.
const PITCH_LIMIT: f32 = 1.47;

/// Damped orbit controller for the model viewer.
///
/// Rotates a camera around the origin in response to pointer drags, with
/// inertia that decays after release, a clamped zoom range, and continuous
/// auto-rotation. Panning is intentionally not provided: the model sits at
/// the origin and stays there.
pub struct OrbitController {
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    dragging: bool,

    /// The camera this controller drives.
    pub camera: Camera,

    rotate_speed: f32,
    zoom_speed: f32,
}

impl OrbitController {
    /// Create a controller at the fixed starting distance, looking at the
    /// origin, with the given viewport aspect ratio.
    #[must_use]
    pub fn new(aspect: f32) -> Self {
        let distance = 3.0;
        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        };

        let mut controller = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            dragging: false,
            camera,
            rotate_speed: 0.005,
            zoom_speed: 0.05,
        };
        controller.update_camera_pos();
        controller
    }

    fn update_camera_pos(&mut self) {
        let orientation = Quat::from_rotation_y(self.yaw)
            * Quat::from_rotation_x(self.pitch);
        let dir = orientation * Vec3::Z;

        self.camera.eye = self.camera.target + dir * self.distance;
        self.camera.up = orientation * Vec3::Y;
    }

    /// Begin or end a pointer drag.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feed a pointer motion delta (pixels). Only applies while dragging.
    pub fn drag(&mut self, delta: Vec2) {
        if !self.dragging {
            return;
        }
        self.yaw_velocity = -delta.x * self.rotate_speed;
        self.pitch_velocity = -delta.y * self.rotate_speed;
    }

    /// Zoom by a scroll delta; distance stays clamped to the fixed range.
    pub fn zoom(&mut self, delta: f32) {
        self.distance *= 1.0 - delta * self.zoom_speed;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.update_camera_pos();
    }

    /// Advance damping and auto-rotation by `dt` seconds, then recompute
    /// the camera position.
    pub fn update(&mut self, dt: f32) {
        self.yaw += self.yaw_velocity + AUTO_ROTATE_SPEED * dt;
        self.pitch = (self.pitch + self.pitch_velocity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);

        if !self.dragging {
            self.yaw_velocity *= DAMPING_RETAIN;
            self.pitch_velocity *= DAMPING_RETAIN;
        }

        self.update_camera_pos();
    }

    /// Update the camera aspect ratio from new viewport dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
    }

    /// Current orbit distance from the target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current yaw angle in radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current pitch angle in radians.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_rotation_advances_yaw() {
        let mut orbit = OrbitController::new(1.6);
        let before = orbit.yaw();
        orbit.update(1.0);
        assert!((orbit.yaw() - before - AUTO_ROTATE_SPEED).abs() < 1e-6);
    }

    #[test]
    fn zoom_is_clamped_to_fixed_range() {
        let mut orbit = OrbitController::new(1.6);
        for _ in 0..100 {
            orbit.zoom(1.0);
        }
        assert_eq!(orbit.distance(), MIN_DISTANCE);
        for _ in 0..100 {
            orbit.zoom(-1.0);
        }
        assert_eq!(orbit.distance(), MAX_DISTANCE);
    }

    #[test]
    fn drag_velocity_decays_after_release() {
        let mut orbit = OrbitController::new(1.6);
        orbit.set_dragging(true);
        orbit.drag(Vec2::new(40.0, 0.0));
        orbit.set_dragging(false);

        orbit.update(0.016);
        let first = orbit.yaw_velocity.abs();
        for _ in 0..120 {
            orbit.update(0.016);
        }
        assert!(orbit.yaw_velocity.abs() < first);
        assert!(orbit.yaw_velocity.abs() < 1e-3);
    }

    #[test]
    fn drag_is_ignored_when_not_dragging() {
        let mut orbit = OrbitController::new(1.6);
        orbit.drag(Vec2::new(40.0, 40.0));
        assert_eq!(orbit.yaw_velocity, 0.0);
        assert_eq!(orbit.pitch_velocity, 0.0);
    }

    #[test]
    fn pitch_never_reaches_the_poles() {
        let mut orbit = OrbitController::new(1.6);
        orbit.set_dragging(true);
        for _ in 0..200 {
            orbit.drag(Vec2::new(0.0, -500.0));
            orbit.update(0.016);
        }
        assert!(orbit.pitch() <= PITCH_LIMIT);
        assert!(orbit.pitch() >= -PITCH_LIMIT);
    }

    #[test]
    fn eye_stays_at_orbit_distance() {
        let mut orbit = OrbitController::new(1.6);
        orbit.update(0.5);
        let radius = (orbit.camera.eye - orbit.camera.target).length();
        assert!((radius - orbit.distance()).abs() < 1e-4);
    }
}
