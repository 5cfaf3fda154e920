//! Per-frame motion state for the particle cloud.

use glam::{EulerRot, Mat4, Vec2, Vec3};

use crate::particles::options::ParticleOptions;

/// Accumulates the cloud's animation state between frames: elapsed time,
/// the slow sinusoidal rotation, and the pointer parallax offset.
///
/// The accumulator is in milliseconds and monotonically non-decreasing
/// while mounted; the shader receives it scaled to seconds.
#[derive(Debug, Default, Clone)]
pub struct FieldMotion {
    elapsed_ms: f32,
    /// Euler rotation (radians) applied to the whole cloud.
    pub rotation: Vec3,
    /// Parallax translation in world units.
    pub offset: Vec2,
}

impl FieldMotion {
    /// Fresh state: zero time, no rotation, no offset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `dt_ms` wall-clock milliseconds.
    ///
    /// Parallax tracks the negated pointer position; rotation follows two
    /// slow sinusoids on x/y plus a steady accumulation on z proportional
    /// to the configured speed.
    pub fn advance(
        &mut self,
        dt_ms: f32,
        options: &ParticleOptions,
        pointer_ndc: Vec2,
    ) {
        self.elapsed_ms += dt_ms.max(0.0) * options.speed;

        if options.move_on_hover {
            self.offset = -pointer_ndc * options.hover_factor;
        }

        if !options.disable_rotation {
            self.rotation.x = (self.elapsed_ms * 2.0e-4).sin() * 0.1;
            self.rotation.y = (self.elapsed_ms * 5.0e-4).cos() * 0.15;
            self.rotation.z += 0.01 * options.speed;
        }
    }

    /// Accumulated time in seconds, as fed to the shader's time uniform.
    #[must_use]
    pub fn time_seconds(&self) -> f32 {
        self.elapsed_ms * 1.0e-3
    }

    /// Model matrix combining the parallax offset and the euler rotation.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.offset.x, self.offset.y, 0.0))
            * Mat4::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_monotonic() {
        let options = ParticleOptions::default();
        let mut motion = FieldMotion::new();
        let mut last = motion.time_seconds();
        for _ in 0..100 {
            motion.advance(16.0, &options, Vec2::ZERO);
            assert!(motion.time_seconds() >= last);
            last = motion.time_seconds();
        }
    }

    #[test]
    fn time_uniform_is_speed_scaled_seconds() {
        let options = ParticleOptions::default(); // speed 0.1
        let mut motion = FieldMotion::new();
        motion.advance(1000.0, &options, Vec2::ZERO);
        assert!((motion.time_seconds() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn parallax_negates_the_pointer() {
        let options = ParticleOptions {
            move_on_hover: true,
            hover_factor: 2.0,
            ..Default::default()
        };
        let mut motion = FieldMotion::new();
        motion.advance(16.0, &options, Vec2::new(0.5, -0.25));
        assert_eq!(motion.offset, Vec2::new(-1.0, 0.5));
    }

    #[test]
    fn hover_disabled_keeps_offset_at_origin() {
        let options = ParticleOptions::default();
        let mut motion = FieldMotion::new();
        motion.advance(16.0, &options, Vec2::new(1.0, 1.0));
        assert_eq!(motion.offset, Vec2::ZERO);
    }

    #[test]
    fn z_rotation_accumulates_each_frame() {
        let options = ParticleOptions::default();
        let mut motion = FieldMotion::new();
        motion.advance(16.0, &options, Vec2::ZERO);
        let first = motion.rotation.z;
        motion.advance(16.0, &options, Vec2::ZERO);
        assert!(motion.rotation.z > first);
        assert!((motion.rotation.z - 2.0 * first).abs() < 1e-6);
    }

    #[test]
    fn disable_rotation_freezes_all_axes() {
        let options = ParticleOptions {
            disable_rotation: true,
            ..Default::default()
        };
        let mut motion = FieldMotion::new();
        for _ in 0..10 {
            motion.advance(16.0, &options, Vec2::ZERO);
        }
        assert_eq!(motion.rotation, Vec3::ZERO);
    }

    #[test]
    fn sinusoidal_axes_stay_bounded() {
        let options = ParticleOptions {
            speed: 1.0,
            ..Default::default()
        };
        let mut motion = FieldMotion::new();
        for _ in 0..10_000 {
            motion.advance(16.0, &options, Vec2::ZERO);
            assert!(motion.rotation.x.abs() <= 0.1 + 1e-6);
            assert!(motion.rotation.y.abs() <= 0.15 + 1e-6);
        }
    }
}
