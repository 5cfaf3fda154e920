//! WGSL shader builds with `#import` support.
//!
//! Both widget shaders pull the shared camera uniform in via
//! `#import glimmer::camera`; this module owns the naga-oil composer that
//! resolves those imports. Composition errors propagate as
//! [`GlimmerError::Shader`] rather than panicking, so a bad shader kills
//! the mount, not the process.

use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::GlimmerError;

/// Shared WGSL module defining the camera uniform layout.
const CAMERA_MODULE: &str =
    include_str!("../../assets/shaders/modules/camera.wgsl");

/// Resolves `#import` directives against the crate's shared WGSL modules
/// and turns shader sources into naga IR.
pub struct ShaderLibrary {
    composer: Composer,
}

impl ShaderLibrary {
    /// Set up the library with the shared camera module registered.
    ///
    /// # Errors
    ///
    /// [`GlimmerError::Shader`] if the embedded module itself is rejected.
    pub fn new() -> Result<Self, GlimmerError> {
        let mut composer = Composer::default();
        let _ = composer
            .add_composable_module(ComposableModuleDescriptor {
                source: CAMERA_MODULE,
                file_path: "modules/camera.wgsl",
                language: ShaderLanguage::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                GlimmerError::Shader(format!(
                    "shared camera module rejected: {e:?}"
                ))
            })?;
        Ok(Self { composer })
    }

    /// Resolve imports in `source` and parse it to naga IR, without
    /// touching a GPU device. This is also the test seam: shaders are
    /// validated headlessly through it.
    ///
    /// # Errors
    ///
    /// [`GlimmerError::Shader`] when parsing or import resolution fails.
    pub fn parse(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, GlimmerError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                GlimmerError::Shader(format!("{file_path}: {e}"))
            })
    }

    /// Parse `source` and hand the IR to the device as a shader module.
    ///
    /// # Errors
    ///
    /// [`GlimmerError::Shader`] when parsing or import resolution fails.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, GlimmerError> {
        let module = self.parse(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_shader_parses() {
        let mut library = ShaderLibrary::new().unwrap();
        let parsed = library.parse(
            include_str!("../../assets/shaders/particles.wgsl"),
            "particles.wgsl",
        );
        assert!(parsed.is_ok(), "{:?}", parsed.err());
    }

    #[test]
    fn mesh_shader_parses() {
        let mut library = ShaderLibrary::new().unwrap();
        let parsed = library.parse(
            include_str!("../../assets/shaders/mesh.wgsl"),
            "mesh.wgsl",
        );
        assert!(parsed.is_ok(), "{:?}", parsed.err());
    }

    #[test]
    fn unresolved_import_is_reported() {
        let mut library = ShaderLibrary::new().unwrap();
        let parsed = library.parse(
            "#import glimmer::nonexistent::Thing\n",
            "broken.wgsl",
        );
        assert!(matches!(parsed, Err(GlimmerError::Shader(_))));
    }
}
