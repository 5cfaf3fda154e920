//! GPU plumbing shared by both widgets.
//!
//! Surface-bound device bring-up and WGSL shader builds with `#import`
//! resolution.

/// wgpu device, surface, and queue bring-up.
pub mod render_context;
/// WGSL shader builds via naga-oil.
pub mod shaders;

pub use render_context::RenderContext;
pub use shaders::ShaderLibrary;
