//! Ambient particle-field widget.
//!
//! A fixed-size cloud of point-sprite particles, generated once at mount
//! and animated entirely on the GPU by a time uniform. The CPU's per-frame
//! work is accumulating time, the optional pointer parallax, and the slow
//! cloud rotation — see [`motion::FieldMotion`].

/// Per-frame motion accumulator (time, rotation, parallax).
pub mod motion;
/// Configuration record with TOML preset support.
pub mod options;
/// GPU pipeline and buffers.
mod renderer;
/// Rejection-sampled particle attribute generation.
pub mod sampling;

use glam::{Vec2, Vec3};

pub use options::ParticleOptions;
pub use sampling::ParticleBuffers;

use crate::camera::{Camera, CameraBinding};
use crate::error::GlimmerError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shaders::ShaderLibrary;
use crate::input::pointer_to_ndc;
use crate::stage::{Container, Stage};
use crate::util::color::parse_palette;
use crate::util::frame_timing::FrameTiming;

use self::motion::FieldMotion;
use self::renderer::ParticleRenderer;

/// A mounted particle-field widget.
///
/// Owns its GPU surface and buffers exclusively; configuration is
/// immutable for the instance's lifetime (teardown + remount to change
/// it). Resize and pointer events are fed in by the embedder and become
/// no-ops once [`teardown`](Self::teardown) has run.
pub struct ParticleField {
    container: String,
    options: ParticleOptions,
    context: RenderContext,
    camera: Camera,
    camera_binding: CameraBinding,
    renderer: ParticleRenderer,
    motion: FieldMotion,
    pointer_ndc: Vec2,
    frame_timing: FrameTiming,
    pointer_listening: bool,
    mounted: bool,
}

impl ParticleField {
    /// Mount a particle field against a registered container.
    ///
    /// A missing container id is a silent no-op: nothing is created and
    /// `Ok(None)` is returned (a warning is logged). Otherwise the GPU
    /// surface is created at the container's current size, the particle
    /// buffers are generated from the ambient random source, and the
    /// container is marked as holding a surface.
    ///
    /// # Errors
    ///
    /// Returns [`GlimmerError::SurfaceInit`] / [`GlimmerError::GpuUnavailable`]
    /// if the GPU context cannot be created, and [`GlimmerError::Shader`]
    /// if the particle shader fails to build.
    pub async fn mount(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        stage: &mut Stage,
        container_id: &str,
        options: ParticleOptions,
    ) -> Result<Option<Self>, GlimmerError> {
        let Some((width, height)) = stage.get(container_id).map(Container::size)
        else {
            log::warn!(
                "particle mount target {container_id:?} not found, skipping"
            );
            return Ok(None);
        };

        let context = RenderContext::new(window, (width, height)).await?;
        let mut library = ShaderLibrary::new()?;

        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, options.camera_distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: width as f32 / height.max(1) as f32,
            fovy: 15.0,
            znear: 0.1,
            zfar: 100.0,
        };
        let mut camera_binding = CameraBinding::new(&context);
        camera_binding.update_gpu(&context.queue, &camera, (width, height));

        let palette = parse_palette(&options.colors);
        let buffers = ParticleBuffers::generate(
            options.count,
            &palette,
            &mut rand::rng(),
        );
        log::debug!(
            "generated {} particles over {} palette colors",
            buffers.len(),
            palette.len()
        );

        let renderer = ParticleRenderer::new(
            &context,
            &mut library,
            &camera_binding.layout,
            &buffers,
            &options,
        )?;

        if let Some(container) = stage.get_mut(container_id) {
            container.attach_surface();
        }

        let pointer_listening = options.move_on_hover;
        Ok(Some(Self {
            container: container_id.to_owned(),
            options,
            context,
            camera,
            camera_binding,
            renderer,
            motion: FieldMotion::new(),
            pointer_ndc: Vec2::ZERO,
            frame_timing: FrameTiming::new(),
            pointer_listening,
            mounted: true,
        }))
    }

    /// Resize the surface and camera to the container's new dimensions.
    /// No-op after teardown (the listener is gone).
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.mounted {
            return;
        }
        self.context.resize(width, height);
        self.camera.resize(width, height);
        self.camera_binding.update_gpu(
            &self.context.queue,
            &self.camera,
            self.context.size(),
        );
    }

    /// Feed a container-relative pointer position in pixels.
    ///
    /// Converted to NDC with y up; ignored unless hover parallax was
    /// enabled at mount, or after teardown.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if !self.mounted || !self.pointer_listening {
            return;
        }
        let (width, height) = self.context.size();
        self.pointer_ndc =
            pointer_to_ndc(x, y, width.max(1) as f32, height.max(1) as f32);
    }

    /// Advance the animation by the wall-clock time since the last call.
    pub fn update(&mut self) {
        let dt_ms = self.frame_timing.tick();
        self.motion.advance(dt_ms, &self.options, self.pointer_ndc);
    }

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain texture cannot be
    /// acquired; the embedder resizes and retries on `Lost`/`Outdated`.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.mounted {
            return Ok(());
        }

        self.renderer.update_gpu(
            &self.context.queue,
            self.motion.model_matrix(),
            self.motion.time_seconds(),
        );

        let frame = self.context.acquire_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("particle encoder"),
            },
        );

        {
            let mut rp =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("particle pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(
                                    wgpu::Color::TRANSPARENT,
                                ),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    ..Default::default()
                });
            self.renderer.draw(&mut rp, &self.camera_binding.bind_group);
        }

        let _ = self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Detach from the container: the surface is removed from it and the
    /// resize/pointer listeners stop responding. The widget can then be
    /// dropped; a new mount creates a fresh instance.
    pub fn teardown(&mut self, stage: &mut Stage) {
        if !self.mounted {
            return;
        }
        if let Some(container) = stage.get_mut(&self.container) {
            container.detach_surface();
        }
        self.pointer_listening = false;
        self.mounted = false;
        log::debug!("particle field detached from {:?}", self.container);
    }

    /// Whether the widget is still mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Id of the container this field was mounted against.
    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container
    }

    /// The immutable configuration this field was mounted with.
    #[must_use]
    pub fn options(&self) -> &ParticleOptions {
        &self.options
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Last pointer position in NDC (origin until a pointer event lands).
    #[must_use]
    pub fn pointer_ndc(&self) -> Vec2 {
        self.pointer_ndc
    }
}
