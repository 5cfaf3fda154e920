//! GPU pipeline for the particle cloud.
//!
//! wgpu has no point-size primitive, so each particle is an instanced
//! billboard quad expanded in clip space by the vertex shader; the
//! fragment shader carves the circular sprite out of the quad.

use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::error::GlimmerError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shaders::ShaderLibrary;
use crate::particles::options::ParticleOptions;
use crate::particles::sampling::ParticleBuffers;

/// Unit quad corners in [-0.5, 0.5]^2, triangle-strip order.
const QUAD_CORNERS: [[f32; 2]; 4] =
    [[-0.5, -0.5], [0.5, -0.5], [-0.5, 0.5], [0.5, 0.5]];

/// Per-instance attributes, interleaved from the generated buffers.
/// Must match the WGSL instance input layout.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ParticleInstance {
    position: [f32; 3],
    random: [f32; 4],
    color: [f32; 3],
}

/// Field uniform: cloud transform plus the animation parameters.
/// Must match the WGSL FieldUniform struct layout exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FieldUniform {
    model: [[f32; 4]; 4],
    time: f32,
    spread: f32,
    base_size: f32,
    size_randomness: f32,
    alpha_particles: f32,
    _pad: [f32; 3],
}

/// Pipeline, buffers, and bind group for one particle cloud.
pub(crate) struct ParticleRenderer {
    pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_count: u32,
    uniform: FieldUniform,
    uniform_buffer: wgpu::Buffer,
    field_bind_group: wgpu::BindGroup,
}

impl ParticleRenderer {
    pub fn new(
        context: &RenderContext,
        library: &mut ShaderLibrary,
        camera_layout: &wgpu::BindGroupLayout,
        buffers: &ParticleBuffers,
        options: &ParticleOptions,
    ) -> Result<Self, GlimmerError> {
        let shader = library.load(
            &context.device,
            "Particle Shader",
            include_str!("../../assets/shaders/particles.wgsl"),
            "particles.wgsl",
        )?;

        let quad_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Particle Quad Buffer"),
                contents: bytemuck::cast_slice(&QUAD_CORNERS),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let instances: Vec<ParticleInstance> = buffers
            .positions
            .iter()
            .zip(buffers.randoms.iter())
            .zip(buffers.colors.iter())
            .map(|((&position, &random), &color)| ParticleInstance {
                position,
                random,
                color,
            })
            .collect();

        let instance_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Particle Instance Buffer"),
                contents: bytemuck::cast_slice(&instances),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let uniform = FieldUniform {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            time: 0.0,
            spread: options.spread,
            base_size: options.base_size,
            size_randomness: options.size_randomness,
            alpha_particles: if options.alpha_particles { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        };

        let uniform_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Field Uniform Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let field_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Field Bind Group Layout"),
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

        let field_bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &field_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                    label: Some("Field Bind Group"),
                });

        let pipeline = Self::create_pipeline(
            context,
            &shader,
            camera_layout,
            &field_layout,
        );

        Ok(Self {
            pipeline,
            quad_buffer,
            instance_buffer,
            instance_count: instances.len() as u32,
            uniform,
            uniform_buffer,
            field_bind_group,
        })
    }

    fn create_pipeline(
        context: &RenderContext,
        shader: &wgpu::ShaderModule,
        camera_layout: &wgpu::BindGroupLayout,
        field_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Particle Pipeline Layout"),
                bind_group_layouts: &[camera_layout, field_layout],
                push_constant_ranges: &[],
            },
        );

        let quad_layout = wgpu::VertexBufferLayout {
            array_stride: size_of::<[f32; 2]>()
                as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 0,
                shader_location: 0, // corner
            }],
        };

        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: size_of::<ParticleInstance>()
                as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 1, // position
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 12,
                    shader_location: 2, // random
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 28,
                    shader_location: 3, // color
                },
            ],
        };

        context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Particle Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[quad_layout, instance_layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: context.format(),
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    cull_mode: None,
                    ..Default::default()
                },
                // Matches the source renderer: no depth buffer, sprites
                // composite purely by blending.
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        )
    }

    /// Upload this frame's cloud transform and time.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue, model: Mat4, time: f32) {
        self.uniform.model = model.to_cols_array_2d();
        self.uniform.time = time;
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniform]),
        );
    }

    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
    ) {
        if self.instance_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, &self.field_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        render_pass.draw(0..QUAD_CORNERS.len() as u32, 0..self.instance_count);
    }
}
