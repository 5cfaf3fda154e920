//! wgpu bootstrap: one surface-bound device per widget.

use crate::error::GlimmerError;

/// Everything a widget needs to talk to the GPU: the logical device, its
/// queue, the surface it presents to, and the live surface configuration.
///
/// Contexts are never shared — each mounted widget brings up its own and
/// drops it on teardown.
pub struct RenderContext {
    /// Logical device.
    pub device: wgpu::Device,
    /// Command queue.
    pub queue: wgpu::Queue,
    /// Presentation surface.
    pub surface: wgpu::Surface<'static>,
    /// Active surface configuration.
    pub config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Bring up the GPU for the given surface target at the given pixel
    /// size.
    ///
    /// Asks for a low-power adapter — these are decoration widgets, not a
    /// game, and they shouldn't spin up a discrete GPU — and picks a
    /// surface format and alpha mode that let the transparent clear
    /// composite over whatever sits behind the window.
    ///
    /// # Errors
    ///
    /// [`GlimmerError::SurfaceInit`] or [`GlimmerError::GpuUnavailable`]
    /// when no usable surface/adapter/device combination exists.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        (width, height): (u32, u32),
    ) -> Result<Self, GlimmerError> {
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::debug!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("glimmer device"),
                ..Default::default()
            })
            .await?;

        let config = pick_config(&surface, &adapter, width, height)?;
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// The surface texture format.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface pixel size as `(width, height)`.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface at a new pixel size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            // Minimized; keep the old configuration until we're visible.
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Grab the next swapchain texture.
    ///
    /// # Errors
    ///
    /// Passes through [`wgpu::SurfaceError`]; callers reconfigure on
    /// `Lost`/`Outdated` and retry on a later frame.
    pub fn acquire_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}

/// Choose a surface configuration: an sRGB format when the surface offers
/// one, an alpha mode that supports per-pixel transparency when available,
/// and vsync.
fn pick_config(
    surface: &wgpu::Surface<'_>,
    adapter: &wgpu::Adapter,
    width: u32,
    height: u32,
) -> Result<wgpu::SurfaceConfiguration, GlimmerError> {
    let caps = surface.get_capabilities(adapter);

    let format = caps
        .formats
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .or_else(|| caps.formats.first().copied())
        .ok_or_else(|| {
            GlimmerError::SurfaceInit(
                "surface reports no texture formats".to_owned(),
            )
        })?;

    let alpha_mode = [
        wgpu::CompositeAlphaMode::PreMultiplied,
        wgpu::CompositeAlphaMode::PostMultiplied,
    ]
    .into_iter()
    .find(|m| caps.alpha_modes.contains(m))
    .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    Ok(wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width,
        height,
        present_mode: wgpu::PresentMode::AutoVsync,
        desired_maximum_frame_latency: 2,
        alpha_mode,
        view_formats: Vec::new(),
    })
}
