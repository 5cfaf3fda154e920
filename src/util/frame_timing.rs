//! Per-frame delta measurement with smoothed FPS.

use web_time::Instant;

/// Measures the wall-clock delta between frames and keeps a smoothed FPS
/// figure for diagnostics.
pub struct FrameTiming {
    /// Last frame timestamp.
    last_frame: Instant,
    /// Smoothed FPS using exponential moving average.
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0).
    smoothing: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a timer anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,
        }
    }

    /// Call once per frame. Returns the milliseconds elapsed since the
    /// previous call and folds the instantaneous FPS into the average.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;

        let dt_ms = elapsed.as_secs_f32() * 1000.0;
        if dt_ms > 0.0 {
            let instant_fps = 1000.0 / dt_ms;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        dt_ms
    }

    /// Get the current FPS (smoothed).
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_returns_non_negative_delta() {
        let mut timing = FrameTiming::new();
        assert!(timing.tick() >= 0.0);
        assert!(timing.tick() >= 0.0);
    }

    #[test]
    fn fps_stays_finite() {
        let mut timing = FrameTiming::new();
        let _ = timing.tick();
        assert!(timing.fps().is_finite());
        assert!(timing.fps() > 0.0);
    }
}
