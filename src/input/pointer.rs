use glam::Vec2;

/// Convert a container-relative pointer position to normalized device
/// coordinates.
///
/// Both axes map to `[-1, 1]`; y is inverted so "up" is positive, matching
/// the particle parallax contract.
#[must_use]
pub fn pointer_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        (x / width) * 2.0 - 1.0,
        -((y / height) * 2.0 - 1.0),
    )
}

/// Tracks absolute pointer positions and yields per-event motion deltas,
/// used to feed the orbit controller's drag input.
#[derive(Debug, Default)]
pub struct PointerTracker {
    last: Option<Vec2>,
}

impl PointerTracker {
    /// Create a tracker with no recorded position.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new absolute position and return the delta from the
    /// previous one. The first motion after construction (or a reset)
    /// yields zero, so a drag never jumps.
    pub fn motion(&mut self, x: f32, y: f32) -> Vec2 {
        let current = Vec2::new(x, y);
        let delta = self.last.map_or(Vec2::ZERO, |last| current - last);
        self.last = Some(current);
        delta
    }

    /// Forget the last position (e.g. when a drag ends).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ndc_center_is_origin() {
        let ndc = pointer_to_ndc(400.0, 300.0, 800.0, 600.0);
        assert!(ndc.x.abs() < 1e-6);
        assert!(ndc.y.abs() < 1e-6);
    }

    #[test]
    fn ndc_corners() {
        // Top-left of the container: left edge, "up" is positive.
        assert_eq!(pointer_to_ndc(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        // Bottom-right.
        assert_eq!(
            pointer_to_ndc(800.0, 600.0, 800.0, 600.0),
            Vec2::new(1.0, -1.0)
        );
    }

    #[test]
    fn first_motion_yields_zero_delta() {
        let mut tracker = PointerTracker::new();
        assert_eq!(tracker.motion(100.0, 50.0), Vec2::ZERO);
        assert_eq!(tracker.motion(110.0, 45.0), Vec2::new(10.0, -5.0));
    }

    #[test]
    fn reset_forgets_position() {
        let mut tracker = PointerTracker::new();
        let _ = tracker.motion(100.0, 50.0);
        tracker.reset();
        assert_eq!(tracker.motion(500.0, 500.0), Vec2::ZERO);
    }
}
