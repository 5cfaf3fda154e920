use wgpu::util::DeviceExt;

use crate::camera::core::{Camera, CameraUniform};
use crate::gpu::render_context::RenderContext;

/// GPU-side camera state shared by both widget pipelines: the uniform, its
/// buffer, and the bind group exposing it at group binding 0.
pub struct CameraBinding {
    /// CPU copy of the uniform contents.
    pub uniform: CameraUniform,
    /// Backing uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout (binding 0, vertex + fragment visible).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over [`Self::buffer`].
    pub bind_group: wgpu::BindGroup,
}

impl CameraBinding {
    /// Create the buffer, layout, and bind group for a camera uniform.
    #[must_use]
    pub fn new(context: &RenderContext) -> Self {
        let uniform = CameraUniform::new();

        let buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
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
                    label: Some("Camera Bind Group"),
                });

        Self {
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Refresh the uniform from the camera and upload it to the GPU.
    pub fn update_gpu(
        &mut self,
        queue: &wgpu::Queue,
        camera: &Camera,
        resolution: (u32, u32),
    ) {
        self.uniform.update(camera, resolution);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
