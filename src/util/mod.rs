//! Shared utilities for both widgets.
//!
//! Helpers for frame timing and hex-color parsing.

pub mod color;
pub mod frame_timing;
