//! Auto-rotating glass model viewer.
//!
//! Mounts a lit scene against a container, loads a glTF asset on a
//! background thread, overrides every mesh material with the glass preset,
//! and renders under the sparkle rig with damped orbit controls.

/// The sparkle light rig: data table, uniform packing, GPU state.
pub mod lighting;
/// Mesh materials and the glass override preset.
pub mod material;
/// GPU pipeline for the loaded meshes.
mod mesh_renderer;
/// glTF loading and the background load thread.
pub mod model;

use std::sync::mpsc;

use glam::Vec2;

pub use material::MeshMaterial;
pub use model::{MeshData, ModelData};

use crate::camera::{CameraBinding, OrbitController};
use crate::error::GlimmerError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shaders::ShaderLibrary;
use crate::stage::{Container, Stage};
use crate::util::frame_timing::FrameTiming;
use crate::viewer::lighting::LightRig;
use crate::viewer::mesh_renderer::MeshRenderer;

/// A mounted model-viewer widget.
///
/// The model slot starts empty and fills exactly once, when the background
/// load resolves; a failed load leaves the scene empty and the viewer
/// keeps rendering. The host loop should stop driving the widget once
/// [`is_running`](Self::is_running) goes false.
pub struct ModelViewer {
    container: String,
    context: RenderContext,
    orbit: OrbitController,
    camera_binding: CameraBinding,
    lights: LightRig,
    renderer: MeshRenderer,
    model_rx: Option<mpsc::Receiver<ModelData>>,
    model_loaded: bool,
    frame_timing: FrameTiming,
    running: bool,
}

impl ModelViewer {
    /// Mount a viewer against a registered container and start loading
    /// `source` (a filesystem path or http(s) URL).
    ///
    /// A missing container id is a silent no-op: nothing is created and
    /// `Ok(None)` is returned (a warning is logged).
    ///
    /// # Errors
    ///
    /// Returns [`GlimmerError::SurfaceInit`] / [`GlimmerError::GpuUnavailable`]
    /// if the GPU context cannot be created, [`GlimmerError::Shader`] if the
    /// mesh shader fails to build, and [`GlimmerError::ThreadSpawn`] if the
    /// load thread fails to start.
    pub async fn mount(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        stage: &mut Stage,
        container_id: &str,
        source: &str,
    ) -> Result<Option<Self>, GlimmerError> {
        let Some((width, height)) = stage.get(container_id).map(Container::size)
        else {
            log::warn!(
                "viewer mount target {container_id:?} not found, skipping"
            );
            return Ok(None);
        };

        let context = RenderContext::new(window, (width, height)).await?;
        let mut library = ShaderLibrary::new()?;

        let orbit =
            OrbitController::new(width as f32 / height.max(1) as f32);
        let mut camera_binding = CameraBinding::new(&context);
        camera_binding.update_gpu(
            &context.queue,
            &orbit.camera,
            (width, height),
        );

        let lights = LightRig::new(&context);
        let renderer = MeshRenderer::new(
            &context,
            &mut library,
            &camera_binding.layout,
            &lights.layout,
        )?;

        let model_rx = Some(model::spawn_load(source.to_owned())?);

        if let Some(container) = stage.get_mut(container_id) {
            container.attach_surface();
        }

        Ok(Some(Self {
            container: container_id.to_owned(),
            context,
            orbit,
            camera_binding,
            lights,
            renderer,
            model_rx,
            model_loaded: false,
            frame_timing: FrameTiming::new(),
            running: true,
        }))
    }

    /// Resize the surface, camera aspect, and depth buffer.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.orbit.resize(width, height);
        self.renderer.resize(&self.context);
        self.camera_binding.update_gpu(
            &self.context.queue,
            &self.orbit.camera,
            self.context.size(),
        );
    }

    /// Begin or end an orbit drag.
    pub fn set_dragging(&mut self, dragging: bool) {
        self.orbit.set_dragging(dragging);
    }

    /// Feed a pointer motion delta in pixels (applies while dragging).
    pub fn drag(&mut self, delta: Vec2) {
        self.orbit.drag(delta);
    }

    /// Zoom by a scroll delta; the orbit distance stays clamped.
    pub fn zoom(&mut self, delta: f32) {
        self.orbit.zoom(delta);
    }

    /// Advance orbit damping/auto-rotation and take delivery of the model
    /// if the background load has resolved.
    pub fn update(&mut self) {
        let dt = self.frame_timing.tick() * 1.0e-3;
        self.orbit.update(dt);

        let mut resolved = false;
        if let Some(rx) = &self.model_rx {
            match rx.try_recv() {
                Ok(mut model) => {
                    // The deliberate "diamond" look: authored materials are
                    // discarded wholesale.
                    model.apply_override(&MeshMaterial::glass());
                    self.renderer.upload_model(&self.context, &model);
                    self.model_loaded = true;
                    resolved = true;
                }
                Err(mpsc::TryRecvError::Empty) => {}
                Err(mpsc::TryRecvError::Disconnected) => {
                    // Load failed; the warning was already logged.
                    resolved = true;
                }
            }
        }
        if resolved {
            self.model_rx = None;
        }
    }

    /// Render one frame: transparent clear, then the model (if loaded)
    /// under the sparkle rig.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain texture cannot be
    /// acquired; the embedder resizes and retries on `Lost`/`Outdated`.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.running {
            return Ok(());
        }

        self.camera_binding.update_gpu(
            &self.context.queue,
            &self.orbit.camera,
            self.context.size(),
        );

        let frame = self.context.acquire_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("viewer encoder"),
            },
        );

        {
            let mut rp =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("viewer pass"),
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
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: self.renderer.depth_view(),
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    ..Default::default()
                });
            self.renderer.draw(
                &mut rp,
                &self.camera_binding.bind_group,
                &self.lights.bind_group,
            );
        }

        let _ = self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Stop the viewer: the host loop sees [`is_running`](Self::is_running)
    /// go false and stops driving it, and the container is released.
    pub fn stop(&mut self, stage: &mut Stage) {
        if !self.running {
            return;
        }
        if let Some(container) = stage.get_mut(&self.container) {
            container.detach_surface();
        }
        self.running = false;
        log::debug!("model viewer stopped on {:?}", self.container);
    }

    /// Whether the viewer is still live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the model has arrived and been uploaded.
    #[must_use]
    pub fn model_loaded(&self) -> bool {
        self.model_loaded
    }

    /// Id of the container this viewer was mounted against.
    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }
}
