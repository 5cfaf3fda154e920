//! Mesh materials and the fixed glass override preset.

/// Material attributes carried by a loaded mesh.
///
/// Populated from the asset's authored PBR values at load time, then
/// unconditionally replaced by [`MeshMaterial::glass`] once the model
/// enters the scene — the widget renders a deliberate "diamond" look, not
/// a faithful material pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshMaterial {
    /// Base color, linear RGB.
    pub base_color: [f32; 3],
    /// Overall opacity (1.0 = opaque).
    pub opacity: f32,
    /// PBR metalness factor.
    pub metalness: f32,
    /// PBR roughness factor.
    pub roughness: f32,
    /// Emissive color, linear RGB.
    pub emissive: [f32; 3],
    /// Environment/reflection intensity boost.
    pub env_intensity: f32,
    /// Refraction ratio (near 1.0 = almost no bending).
    pub refraction_ratio: f32,
    /// Specular highlight color.
    pub specular: [f32; 3],
    /// Phong-style shininess exponent.
    pub shininess: f32,
}

impl Default for MeshMaterial {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            metalness: 0.0,
            roughness: 0.5,
            emissive: [0.0, 0.0, 0.0],
            env_intensity: 1.0,
            refraction_ratio: 1.0,
            specular: [1.0, 1.0, 1.0],
            shininess: 30.0,
        }
    }
}

impl MeshMaterial {
    /// The fixed glass preset applied to every mesh of a loaded model:
    /// translucent, near-zero roughness, full metalness, boosted
    /// reflections, pure white everywhere, no emissive.
    #[must_use]
    pub fn glass() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0],
            opacity: 0.82,
            metalness: 1.0,
            roughness: 0.001,
            emissive: [0.0, 0.0, 0.0],
            env_intensity: 7.5,
            refraction_ratio: 0.999,
            specular: [1.0, 1.0, 1.0],
            shininess: 1000.0,
        }
    }
}

/// GPU uniform for the glass material.
/// Must match the WGSL GlassUniform struct layout exactly.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuMaterial {
    /// rgb = base color, a = opacity.
    pub color: [f32; 4],
    /// rgb = emissive, a = environment/reflection intensity.
    pub emissive: [f32; 4],
    /// x = metalness, y = roughness, z = refraction ratio, w = shininess.
    pub params: [f32; 4],
}

impl From<&MeshMaterial> for GpuMaterial {
    fn from(m: &MeshMaterial) -> Self {
        Self {
            color: [
                m.base_color[0],
                m.base_color[1],
                m.base_color[2],
                m.opacity,
            ],
            emissive: [
                m.emissive[0],
                m.emissive[1],
                m.emissive[2],
                m.env_intensity,
            ],
            params: [
                m.metalness,
                m.roughness,
                m.refraction_ratio,
                m.shininess,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glass_preset_values() {
        let glass = MeshMaterial::glass();
        assert_eq!(glass.opacity, 0.82);
        assert_eq!(glass.metalness, 1.0);
        assert_eq!(glass.roughness, 0.001);
        assert_eq!(glass.base_color, [1.0, 1.0, 1.0]);
        assert_eq!(glass.emissive, [0.0, 0.0, 0.0]);
        assert_eq!(glass.env_intensity, 7.5);
        assert_eq!(glass.refraction_ratio, 0.999);
        assert_eq!(glass.shininess, 1000.0);
    }

    #[test]
    fn gpu_material_packs_fields() {
        let gpu = GpuMaterial::from(&MeshMaterial::glass());
        assert_eq!(gpu.color, [1.0, 1.0, 1.0, 0.82]);
        assert_eq!(gpu.emissive[3], 7.5);
        assert_eq!(gpu.params, [1.0, 0.001, 0.999, 1000.0]);
    }
}
