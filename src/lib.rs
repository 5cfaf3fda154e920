// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU decoration widgets built on wgpu.
//!
//! Glimmer provides two independent, self-contained visual widgets:
//!
//! - [`viewer::ModelViewer`] - a lit, auto-rotating glTF viewer that applies
//!   a fixed glass material to every mesh and renders it under a large
//!   decorative "sparkle" light rig with damped orbit controls.
//! - [`particles::ParticleField`] - an ambient cloud of point-sprite
//!   particles, rejection-sampled inside a unit ball and animated entirely
//!   on the GPU by a time uniform, with optional pointer parallax.
//!
//! # Key entry points
//!
//! - [`stage::Stage`] - the runtime registry of mount targets (containers)
//! - [`particles::ParticleOptions`] - particle configuration with TOML
//!   preset support
//! - `shell::Shell` - a winit window host for either widget (behind the
//!   `viewer` feature)
//!
//! # Architecture
//!
//! Widgets are windowing-agnostic: each owns its own
//! [`gpu::RenderContext`] (surface, device, queue), camera, and per-frame
//! state, and exposes `resize` / `update` / `render` hooks that the shell
//! (or any embedder) drives from its event loop. The only background work
//! is the one-shot model-load thread, which delivers the parsed asset over
//! an `mpsc` channel drained non-blockingly each frame.

pub mod camera;
pub mod error;
pub mod gpu;
pub mod input;
pub mod particles;
#[cfg(feature = "viewer")]
pub mod shell;
pub mod stage;
pub mod util;
pub mod viewer;

pub use error::GlimmerError;
pub use particles::{ParticleField, ParticleOptions};
#[cfg(feature = "viewer")]
pub use shell::Shell;
pub use stage::{Container, Stage};
pub use viewer::ModelViewer;
