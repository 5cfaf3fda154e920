//! Crate-level error type.
//!
//! One flat enum: every fallible seam in the crate (GPU bring-up, shader
//! builds, model loading, preset files, the window shell) funnels into it.
//! wgpu's init errors arrive through `From` impls so `?` works at the
//! call sites.

use std::fmt;

/// Errors produced by the glimmer crate.
#[derive(Debug)]
pub enum GlimmerError {
    /// The presentation surface could not be created or configured.
    SurfaceInit(String),
    /// No adapter/device combination was usable.
    GpuUnavailable(String),
    /// A WGSL source failed to compose or parse.
    Shader(String),
    /// Fetching or parsing a model asset failed.
    ModelLoad(String),
    /// Filesystem failure.
    Io(std::io::Error),
    /// A background worker thread could not be started.
    ThreadSpawn(std::io::Error),
    /// A TOML preset failed to parse or serialize.
    OptionsParse(String),
    /// The window shell's event loop failed.
    Shell(String),
}

impl fmt::Display for GlimmerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceInit(msg) => {
                write!(f, "render surface setup failed: {msg}")
            }
            Self::GpuUnavailable(msg) => write!(f, "GPU unavailable: {msg}"),
            Self::Shader(msg) => write!(f, "shader build failed: {msg}"),
            Self::ModelLoad(msg) => {
                write!(f, "could not load model: {msg}")
            }
            Self::Io(e) => write!(f, "i/o failure: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "could not spawn worker thread: {e}")
            }
            Self::OptionsParse(msg) => write!(f, "bad options file: {msg}"),
            Self::Shell(msg) => write!(f, "window shell failure: {msg}"),
        }
    }
}

impl std::error::Error for GlimmerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Self::Io(e) | Self::ThreadSpawn(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<std::io::Error> for GlimmerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<wgpu::CreateSurfaceError> for GlimmerError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        Self::SurfaceInit(e.to_string())
    }
}

impl From<wgpu::RequestAdapterError> for GlimmerError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        Self::GpuUnavailable(format!("no compatible adapter: {e}"))
    }
}

impl From<wgpu::RequestDeviceError> for GlimmerError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        Self::GpuUnavailable(format!("device request rejected: {e}"))
    }
}
