//! The decorative "sparkle" light rig.
//!
//! The rig is pure set dressing: a dense shell of full-intensity white
//! point lights plus a handful of spotlights and two key directionals, all
//! aimed at the origin to maximize specular glints on the glass material.
//! Positions and intensities are constants — the rig is data, not code, so
//! its shape is testable.

use bytemuck::Zeroable;
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::gpu::render_context::RenderContext;

/// Upper bound of the GPU light array. Must match the WGSL constant.
pub const MAX_LIGHTS: usize = 112;

/// Low-intensity fill so facets away from every light stay visible.
pub const AMBIENT_INTENSITY: f32 = 0.18;

/// Point-light intensity shared by the whole sparkle shell.
const POINT_INTENSITY: f32 = 10.0;

/// The sparkle shell: three rings of 32 white point lights. The second
/// ring duplicates the first pushed 0.5 outward on every axis; the third
/// widens the shell further for glints at grazing angles.
const SPARKLE_POINTS: [[f32; 3]; 96] = [
    // Inner ring
    [2.0, 3.0, 4.0], [-3.0, 2.0, 2.0], [0.0, -3.0, 3.0], [1.0, -2.0, 4.0],
    [-2.0, 4.0, -2.0], [0.0, 0.0, 6.0], [3.0, -3.0, 2.0], [-4.0, 1.0, 5.0],
    [0.0, 5.0, 0.0], [0.0, -5.0, 0.0], [5.0, 0.0, 0.0], [-5.0, 0.0, 0.0],
    [2.0, -4.0, 5.0], [-3.0, -5.0, 2.0], [4.0, 2.0, -3.0], [-2.0, -3.0, 4.0],
    [3.0, 4.0, -2.0], [-4.0, -2.0, 3.0], [4.0, 4.0, 4.0], [-4.0, 4.0, 4.0],
    [4.0, -4.0, 4.0], [-4.0, -4.0, 4.0], [4.0, 4.0, -4.0], [-4.0, 4.0, -4.0],
    [4.0, -4.0, -4.0], [-4.0, -4.0, -4.0], [6.0, 0.0, 0.0], [-6.0, 0.0, 0.0],
    [0.0, 6.0, 0.0], [0.0, -6.0, 0.0], [0.0, 0.0, 8.0], [0.0, 0.0, -8.0],
    // Offset duplicate ring
    [2.5, 3.5, 4.5], [-3.5, 2.5, 2.5], [0.5, -3.5, 3.5], [1.5, -2.5, 4.5],
    [-2.5, 4.5, -2.5], [0.5, 0.5, 6.5], [3.5, -3.5, 2.5], [-4.5, 1.5, 5.5],
    [0.5, 5.5, 0.5], [0.5, -5.5, 0.5], [5.5, 0.5, 0.5], [-5.5, 0.5, 0.5],
    [2.5, -4.5, 5.5], [-3.5, -5.5, 2.5], [4.5, 2.5, -3.5], [-2.5, -3.5, 4.5],
    [3.5, 4.5, -2.5], [-4.5, -2.5, 3.5], [4.5, 4.5, 4.5], [-4.5, 4.5, 4.5],
    [4.5, -4.5, 4.5], [-4.5, -4.5, 4.5], [4.5, 4.5, -4.5], [-4.5, 4.5, -4.5],
    [4.5, -4.5, -4.5], [-4.5, -4.5, -4.5], [6.5, 0.5, 0.5], [-6.5, 0.5, 0.5],
    [0.5, 6.5, 0.5], [0.5, -6.5, 0.5], [0.5, 0.5, 8.5], [0.5, 0.5, -8.5],
    // Wide outer ring
    [3.0, 6.0, 5.0], [-3.0, 6.0, 5.0], [3.0, -6.0, 5.0], [-3.0, -6.0, 5.0],
    [6.0, 3.0, 5.0], [-6.0, 3.0, 5.0], [6.0, -3.0, 5.0], [-6.0, -3.0, 5.0],
    [5.0, 5.0, 7.0], [-5.0, 5.0, 7.0], [5.0, -5.0, 7.0], [-5.0, -5.0, 7.0],
    [7.0, 0.0, 0.0], [-7.0, 0.0, 0.0], [0.0, 7.0, 0.0], [0.0, -7.0, 0.0],
    [0.0, 0.0, 10.0], [0.0, 0.0, -10.0], [8.0, 8.0, 8.0], [-8.0, 8.0, 8.0],
    [8.0, -8.0, 8.0], [-8.0, -8.0, 8.0], [8.0, 8.0, -8.0], [-8.0, 8.0, -8.0],
    [8.0, -8.0, -8.0], [-8.0, -8.0, -8.0], [10.0, 0.0, 0.0], [-10.0, 0.0, 0.0],
    [0.0, 10.0, 0.0], [0.0, -10.0, 0.0], [0.0, 0.0, 12.0], [0.0, 0.0, -12.0],
];

/// Spotlights: (position, intensity, cone angle divisor of pi, penumbra).
/// The second trio re-aims the first three at reduced intensity for layered
/// highlights.
const SPARKLE_SPOTS: [([f32; 3], f32, f32, f32); 9] = [
    ([2.0, 6.0, 4.0], 10.0, 8.0, 0.5),
    ([-4.0, 5.0, 3.0], 10.0, 10.0, 0.7),
    ([0.0, -7.0, 5.0], 9.0, 7.0, 0.6),
    ([7.0, -8.0, 8.0], 8.0, 9.0, 0.6),
    ([-7.0, 8.0, -8.0], 8.0, 9.0, 0.6),
    ([0.0, 10.0, -9.0], 8.0, 9.0, 0.6),
    ([2.0, 6.0, 4.0], 6.4, 8.0, 0.5),
    ([-4.0, 5.0, 3.0], 6.4, 10.0, 0.7),
    ([0.0, -7.0, 5.0], 5.6, 7.0, 0.6),
];

/// Key directionals: (position the light shines from, intensity).
const SPARKLE_DIRECTIONALS: [([f32; 3], f32); 2] =
    [([8.0, 16.0, 12.0], 16.0), ([4.0, 8.0, 6.0], 8.0)];

/// What a rig light is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Omnidirectional falloff from a world position.
    Point,
    /// Cone-limited falloff aimed at the origin.
    Spot {
        /// Half-angle of the cone in radians.
        cone_angle: f32,
        /// Soft-edge fraction of the cone.
        penumbra: f32,
    },
    /// Parallel rays along the origin-ward direction.
    Directional,
}

/// One light of the rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSpec {
    /// Kind and kind-specific parameters.
    pub kind: LightKind,
    /// World position (or source position for directionals).
    pub position: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
}

/// Build the full sparkle rig as data.
#[must_use]
pub fn sparkle_rig() -> Vec<LightSpec> {
    let mut rig = Vec::with_capacity(
        SPARKLE_POINTS.len() + SPARKLE_SPOTS.len() + SPARKLE_DIRECTIONALS.len(),
    );

    for p in SPARKLE_POINTS {
        rig.push(LightSpec {
            kind: LightKind::Point,
            position: Vec3::from_array(p),
            intensity: POINT_INTENSITY,
        });
    }

    for (p, intensity, divisor, penumbra) in SPARKLE_SPOTS {
        rig.push(LightSpec {
            kind: LightKind::Spot {
                cone_angle: std::f32::consts::PI / divisor,
                penumbra,
            },
            position: Vec3::from_array(p),
            intensity,
        });
    }

    for (p, intensity) in SPARKLE_DIRECTIONALS {
        rig.push(LightSpec {
            kind: LightKind::Directional,
            position: Vec3::from_array(p),
            intensity,
        });
    }

    rig
}

/// One light as the shader sees it.
/// Must match the WGSL SceneLight struct layout exactly.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    /// xyz = position (point/spot) or source direction anchor
    /// (directional), w = kind: 0 point, 1 spot, 2 directional.
    pub position: [f32; 4],
    /// x = intensity, y = cos(cone angle), z = penumbra, w unused.
    pub params: [f32; 4],
    /// xyz = normalized aim direction toward the origin, w unused.
    pub direction: [f32; 4],
}

/// GPU uniform holding the whole rig.
/// Must match the WGSL LightRigUniform struct layout exactly.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRigUniform {
    /// Ambient fill intensity.
    pub ambient: f32,
    /// Number of populated entries in `lights`.
    pub count: u32,
    /// Padding for GPU alignment.
    pub(crate) _pad: [f32; 2],
    /// Fixed-size light array; entries past `count` are zeroed.
    pub lights: [GpuLight; MAX_LIGHTS],
}

impl LightRigUniform {
    /// Pack a rig description into the uniform layout. Lights past
    /// [`MAX_LIGHTS`] are dropped (and logged) rather than overflowing.
    #[must_use]
    pub fn from_specs(specs: &[LightSpec], ambient: f32) -> Self {
        if specs.len() > MAX_LIGHTS {
            log::warn!(
                "light rig has {} entries, truncating to {MAX_LIGHTS}",
                specs.len()
            );
        }

        let mut lights = [GpuLight::zeroed(); MAX_LIGHTS];
        let count = specs.len().min(MAX_LIGHTS);

        for (slot, spec) in lights.iter_mut().zip(specs.iter()) {
            let aim = (-spec.position).normalize_or_zero();
            let (kind, cone_cos, penumbra) = match spec.kind {
                LightKind::Point => (0.0, 0.0, 0.0),
                LightKind::Spot {
                    cone_angle,
                    penumbra,
                } => (1.0, cone_angle.cos(), penumbra),
                LightKind::Directional => (2.0, 0.0, 0.0),
            };

            *slot = GpuLight {
                position: [
                    spec.position.x,
                    spec.position.y,
                    spec.position.z,
                    kind,
                ],
                params: [spec.intensity, cone_cos, penumbra, 0.0],
                direction: [aim.x, aim.y, aim.z, 0.0],
            };
        }

        Self {
            ambient,
            count: count as u32,
            _pad: [0.0; 2],
            lights,
        }
    }
}

/// GPU-side rig state: the uniform, its buffer, and the bind group.
pub struct LightRig {
    /// CPU copy of the uniform contents.
    pub uniform: LightRigUniform,
    /// Backing uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout (binding 0, fragment visible).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over [`Self::buffer`].
    pub bind_group: wgpu::BindGroup,
}

impl LightRig {
    /// Upload the sparkle rig and build its bind group.
    #[must_use]
    pub fn new(context: &RenderContext) -> Self {
        let uniform =
            LightRigUniform::from_specs(&sparkle_rig(), AMBIENT_INTENSITY);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Light Rig Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Light Rig Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );

        let bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                    label: Some("Light Rig Bind Group"),
                });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_shape_matches_the_fixture() {
        let rig = sparkle_rig();
        let points = rig
            .iter()
            .filter(|l| l.kind == LightKind::Point)
            .count();
        let spots = rig
            .iter()
            .filter(|l| matches!(l.kind, LightKind::Spot { .. }))
            .count();
        let directionals = rig
            .iter()
            .filter(|l| l.kind == LightKind::Directional)
            .count();

        assert_eq!(points, 96);
        assert_eq!(spots, 9);
        assert_eq!(directionals, 2);
        assert_eq!(rig.len(), 107);
        assert!(rig.len() <= MAX_LIGHTS);
    }

    #[test]
    fn every_light_has_positive_intensity() {
        assert!(sparkle_rig().iter().all(|l| l.intensity > 0.0));
    }

    #[test]
    fn spot_cones_are_sane() {
        for light in sparkle_rig() {
            if let LightKind::Spot {
                cone_angle,
                penumbra,
            } = light.kind
            {
                assert!(cone_angle > 0.0);
                assert!(cone_angle < std::f32::consts::FRAC_PI_2);
                assert!((0.0..=1.0).contains(&penumbra));
            }
        }
    }

    #[test]
    fn uniform_packs_kinds_and_count() {
        let uniform =
            LightRigUniform::from_specs(&sparkle_rig(), AMBIENT_INTENSITY);
        assert_eq!(uniform.count, 107);
        assert_eq!(uniform.ambient, AMBIENT_INTENSITY);
        // First 96 entries are points, then spots, then directionals.
        assert_eq!(uniform.lights[0].position[3], 0.0);
        assert_eq!(uniform.lights[96].position[3], 1.0);
        assert_eq!(uniform.lights[105].position[3], 2.0);
        assert_eq!(uniform.lights[106].position[3], 2.0);
        // Entries past count stay zeroed.
        assert_eq!(uniform.lights[107].params[0], 0.0);
    }

    #[test]
    fn spot_aim_points_at_the_origin() {
        let uniform =
            LightRigUniform::from_specs(&sparkle_rig(), AMBIENT_INTENSITY);
        let spot = uniform.lights[96];
        let pos = Vec3::new(spot.position[0], spot.position[1], spot.position[2]);
        let aim = Vec3::new(
            spot.direction[0],
            spot.direction[1],
            spot.direction[2],
        );
        let expected = (-pos).normalize();
        assert!((aim - expected).length() < 1e-6);
    }
}
