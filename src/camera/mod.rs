//! Camera system for both widgets.
//!
//! Provides the shared perspective camera, its GPU uniform/bind-group
//! plumbing, and the damped orbit controller used by the model viewer.

/// Camera uniform buffer, layout, and bind group.
pub mod binding;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Damped, auto-rotating orbit controller (model viewer controls).
pub mod orbit;

pub use binding::CameraBinding;
pub use core::{Camera, CameraUniform};
pub use orbit::OrbitController;
