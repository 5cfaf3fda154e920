//! Pointer input helpers: NDC conversion for the particle parallax and
//! motion-delta tracking for orbit drags.

/// Pointer position conversion and drag tracking.
pub mod pointer;

pub use pointer::{pointer_to_ndc, PointerTracker};
