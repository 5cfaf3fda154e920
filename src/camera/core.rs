use glam::{Mat4, Vec3};

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Build the view matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Build the projection matrix.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// Update the aspect ratio from new viewport pixel dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

/// GPU uniform buffer holding camera matrices and viewport metadata.
///
/// The particle shader needs view and projection separately (billboard
/// expansion happens between them); the mesh shader consumes the combined
/// matrix. Must match the WGSL `CameraUniform` layout exactly.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// View matrix.
    pub view: [[f32; 4]; 4],
    /// Projection matrix.
    pub proj: [[f32; 4]; 4],
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Viewport pixel dimensions.
    pub resolution: [f32; 2],
    /// Padding for GPU alignment.
    pub(crate) _pad: [f32; 2],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity matrices.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: Mat4::IDENTITY.to_cols_array_2d(),
            proj: Mat4::IDENTITY.to_cols_array_2d(),
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.6,
            resolution: [1.0, 1.0],
            _pad: [0.0; 2],
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update(&mut self, camera: &Camera, resolution: (u32, u32)) {
        self.view = camera.build_view().to_cols_array_2d();
        self.proj = camera.build_projection().to_cols_array_2d();
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
        self.resolution = [resolution.0 as f32, resolution.1 as f32];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 800.0 / 600.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    #[test]
    fn resize_updates_aspect_exactly() {
        let mut camera = test_camera();
        camera.resize(400, 300);
        assert_eq!(camera.aspect, 400.0 / 300.0);
    }

    #[test]
    fn resize_ignores_zero_dimensions() {
        let mut camera = test_camera();
        let before = camera.aspect;
        camera.resize(0, 300);
        camera.resize(400, 0);
        assert_eq!(camera.aspect, before);
    }

    #[test]
    fn view_proj_is_projection_times_view() {
        let camera = test_camera();
        let combined = camera.build_matrix();
        let manual = camera.build_projection() * camera.build_view();
        assert_eq!(combined.to_cols_array(), manual.to_cols_array());
    }

    #[test]
    fn uniform_tracks_camera_state() {
        let camera = test_camera();
        let mut uniform = CameraUniform::new();
        uniform.update(&camera, (800, 600));
        assert_eq!(uniform.position, [0.0, 0.0, 3.0]);
        assert_eq!(uniform.resolution, [800.0, 600.0]);
        assert_eq!(uniform.aspect, camera.aspect);
    }
}
