//! GPU pipeline for the loaded model's meshes.

use wgpu::util::DeviceExt;

use crate::error::GlimmerError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shaders::ShaderLibrary;
use crate::viewer::material::{GpuMaterial, MeshMaterial};
use crate::viewer::model::ModelData;

/// Vertex layout for mesh geometry.
/// Must match the WGSL vertex input.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct MeshVertex {
    position: [f32; 3],
    normal: [f32; 3],
}

/// One uploaded mesh primitive.
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Pipeline and mesh buffers for the model pass. Meshes arrive once, when
/// the background load resolves; until then the pass draws nothing.
pub(crate) struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    material_buffer: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    depth_view: wgpu::TextureView,
}

impl MeshRenderer {
    pub fn new(
        context: &RenderContext,
        library: &mut ShaderLibrary,
        camera_layout: &wgpu::BindGroupLayout,
        lights_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, GlimmerError> {
        let shader = library.load(
            &context.device,
            "Mesh Shader",
            include_str!("../../assets/shaders/mesh.wgsl"),
            "mesh.wgsl",
        )?;

        let material = GpuMaterial::from(&MeshMaterial::glass());
        let material_buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Glass Material Buffer"),
                contents: bytemuck::cast_slice(&[material]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let material_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Glass Material Bind Group Layout"),
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

        let material_bind_group =
            context
                .device
                .create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &material_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: material_buffer.as_entire_binding(),
                    }],
                    label: Some("Glass Material Bind Group"),
                });

        let pipeline = Self::create_pipeline(
            context,
            &shader,
            camera_layout,
            lights_layout,
            &material_layout,
        );

        let depth_view = Self::create_depth_view(context);

        Ok(Self {
            pipeline,
            material_buffer,
            material_bind_group,
            meshes: Vec::new(),
            depth_view,
        })
    }

    fn create_depth_view(context: &RenderContext) -> wgpu::TextureView {
        let (width, height) = context.size();
        let texture = context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Viewer Depth Texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_pipeline(
        context: &RenderContext,
        shader: &wgpu::ShaderModule,
        camera_layout: &wgpu::BindGroupLayout,
        lights_layout: &wgpu::BindGroupLayout,
        material_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let pipeline_layout = context.device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("Mesh Pipeline Layout"),
                bind_group_layouts: &[
                    camera_layout,
                    lights_layout,
                    material_layout,
                ],
                push_constant_ranges: &[],
            },
        );

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: size_of::<MeshVertex>()
                as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0, // position
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1, // normal
                },
            ],
        };

        context.device.create_render_pipeline(
            &wgpu::RenderPipelineDescriptor {
                label: Some("Mesh Pipeline"),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_layout],
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
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: Some(wgpu::Face::Back),
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            },
        )
    }

    /// Upload a loaded model's meshes. The glass override has already run,
    /// so a single material uniform serves every mesh.
    pub fn upload_model(&mut self, context: &RenderContext, model: &ModelData) {
        let Some(first) = model.meshes.first() else {
            return;
        };

        self.meshes = model
            .meshes
            .iter()
            .map(|mesh| {
                let vertices: Vec<MeshVertex> = mesh
                    .positions
                    .iter()
                    .zip(mesh.normals.iter())
                    .map(|(&position, &normal)| MeshVertex {
                        position,
                        normal,
                    })
                    .collect();

                let vertex_buffer = context.device.create_buffer_init(
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Mesh Vertex Buffer"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    },
                );
                let index_buffer = context.device.create_buffer_init(
                    &wgpu::util::BufferInitDescriptor {
                        label: Some("Mesh Index Buffer"),
                        contents: bytemuck::cast_slice(&mesh.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    },
                );

                GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.indices.len() as u32,
                }
            })
            .collect();

        let material = GpuMaterial::from(&first.material);
        context.queue.write_buffer(
            &self.material_buffer,
            0,
            bytemuck::cast_slice(&[material]),
        );
    }

    /// Recreate the depth buffer after a surface resize.
    pub fn resize(&mut self, context: &RenderContext) {
        self.depth_view = Self::create_depth_view(context);
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        lights_bind_group: &'a wgpu::BindGroup,
    ) {
        if self.meshes.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        render_pass.set_bind_group(1, lights_bind_group, &[]);
        render_pass.set_bind_group(2, &self.material_bind_group, &[]);
        for mesh in &self.meshes {
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                mesh.index_buffer.slice(..),
                wgpu::IndexFormat::Uint32,
            );
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
