//! Standalone widget window backed by winit.
//!
//! Hosts exactly one widget per window: the window doubles as the mount
//! container, registered on a [`Stage`] under a fixed id. Escape (or
//! closing the window) stops the widget and exits the loop.
//!
//! ```no_run
//! # use glimmer::Shell;
//! Shell::builder()
//!     .with_model("assets/models/diamond.glb")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    error::GlimmerError,
    input::PointerTracker,
    particles::{ParticleField, ParticleOptions},
    stage::Stage,
    viewer::ModelViewer,
};

/// Container id the shell registers its window under.
const WINDOW_CONTAINER: &str = "window";

/// Starting window size in logical pixels. Decoration widgets don't need
/// the whole screen; users resize if they want more.
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 800;

/// Which widget the shell hosts.
#[derive(Debug, Clone)]
enum WidgetSpec {
    Model { source: String },
    Particles { options: ParticleOptions },
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Shell`].
pub struct ShellBuilder {
    widget: WidgetSpec,
    title: String,
}

impl ShellBuilder {
    /// Create a builder with sensible defaults (title "Glimmer", default
    /// particle field).
    fn new() -> Self {
        Self {
            widget: WidgetSpec::Particles {
                options: ParticleOptions::default(),
            },
            title: "Glimmer".into(),
        }
    }

    /// Host a model viewer for the given asset path or http(s) URL.
    #[must_use]
    pub fn with_model(mut self, source: impl Into<String>) -> Self {
        self.widget = WidgetSpec::Model {
            source: source.into(),
        };
        self
    }

    /// Host a particle field with the given options.
    #[must_use]
    pub fn with_particles(mut self, options: ParticleOptions) -> Self {
        self.widget = WidgetSpec::Particles { options };
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Shell`].
    #[must_use]
    pub fn build(self) -> Shell {
        Shell {
            widget: self.widget,
            title: self.title,
        }
    }
}

// ── Shell ────────────────────────────────────────────────────────────────

/// A standalone window hosting one decoration widget.
///
/// Construct via [`Shell::builder`], then call [`run`](Self::run) to enter
/// the event loop.
pub struct Shell {
    widget: WidgetSpec,
    title: String,
}

impl Shell {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ShellBuilder {
        ShellBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the widget
    /// stops or the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`GlimmerError::Shell`] if the event loop cannot be created
    /// or fails while running.
    pub fn run(self) -> Result<(), GlimmerError> {
        let event_loop =
            EventLoop::new().map_err(|e| GlimmerError::Shell(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ShellApp {
            window: None,
            stage: Stage::new(),
            mounted: None,
            pointer: PointerTracker::new(),
            widget: self.widget,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| GlimmerError::Shell(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// The widget once mounted.
enum MountedWidget {
    Viewer(ModelViewer),
    Field(ParticleField),
}

/// Internal winit application handler.
struct ShellApp {
    window: Option<Arc<Window>>,
    stage: Stage,
    mounted: Option<MountedWidget>,
    pointer: PointerTracker,
    widget: WidgetSpec,
    title: String,
}

/// Compute the wgpu surface size — the full window, never zero.
fn surface_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ShellApp {
    /// Stop the mounted widget and release its container.
    fn shutdown_widget(&mut self) {
        match &mut self.mounted {
            Some(MountedWidget::Viewer(viewer)) => {
                viewer.stop(&mut self.stage);
            }
            Some(MountedWidget::Field(field)) => {
                field.teardown(&mut self.stage);
            }
            None => {}
        }
    }
}

impl ApplicationHandler for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_transparent(true)
            .with_inner_size(winit::dpi::LogicalSize::new(
                DEFAULT_WINDOW_WIDTH,
                DEFAULT_WINDOW_HEIGHT,
            ));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let (width, height) = surface_size(window.inner_size());
        self.stage.register(WINDOW_CONTAINER, width, height);

        let mount_result = match &self.widget {
            WidgetSpec::Model { source } => {
                pollster::block_on(ModelViewer::mount(
                    window.clone(),
                    &mut self.stage,
                    WINDOW_CONTAINER,
                    source,
                ))
                .map(|viewer| viewer.map(MountedWidget::Viewer))
            }
            WidgetSpec::Particles { options } => {
                pollster::block_on(ParticleField::mount(
                    window.clone(),
                    &mut self.stage,
                    WINDOW_CONTAINER,
                    options.clone(),
                ))
                .map(|field| field.map(MountedWidget::Field))
            }
        };

        match mount_result {
            Ok(Some(widget)) => {
                self.mounted = Some(widget);
            }
            Ok(None) => {
                // Unreachable in practice: the container was registered
                // just above.
                log::error!("widget mount skipped, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => {
                log::error!("Failed to mount widget: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            self.shutdown_widget();
            event_loop.exit();
            return;
        }

        // Guard: both window and widget must be initialised.
        if self.window.is_none() || self.mounted.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(event_size) => {
                let (width, height) = surface_size(event_size);
                let _ = self.stage.resize(WINDOW_CONTAINER, width, height);
                match &mut self.mounted {
                    Some(MountedWidget::Viewer(viewer)) => {
                        viewer.resize(width, height);
                    }
                    Some(MountedWidget::Field(field)) => {
                        field.resize(width, height);
                    }
                    None => {}
                }
            }

            WindowEvent::RedrawRequested => {
                let mut live = true;
                match &mut self.mounted {
                    Some(MountedWidget::Viewer(viewer)) => {
                        viewer.update();
                        handle_render(viewer.render(), |w, h| {
                            viewer.resize(w, h);
                        }, self.window.as_deref());
                        live = viewer.is_running();
                    }
                    Some(MountedWidget::Field(field)) => {
                        field.update();
                        handle_render(field.render(), |w, h| {
                            field.resize(w, h);
                        }, self.window.as_deref());
                        live = field.is_mounted();
                    }
                    None => {}
                }

                if !live {
                    event_loop.exit();
                    return;
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                let pressed = state == ElementState::Pressed;
                if let Some(MountedWidget::Viewer(viewer)) = &mut self.mounted
                {
                    viewer.set_dragging(pressed);
                }
                if !pressed {
                    self.pointer.reset();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let (x, y) = (position.x as f32, position.y as f32);
                let delta = self.pointer.motion(x, y);
                match &mut self.mounted {
                    Some(MountedWidget::Viewer(viewer)) => {
                        viewer.drag(delta);
                    }
                    Some(MountedWidget::Field(field)) => {
                        field.pointer_moved(x, y);
                    }
                    None => {}
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                if let Some(MountedWidget::Viewer(viewer)) = &mut self.mounted
                {
                    viewer.zoom(scroll_delta);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                use winit::keyboard::PhysicalKey;
                if event.physical_key
                    == PhysicalKey::Code(winit::keyboard::KeyCode::Escape)
                {
                    self.shutdown_widget();
                    event_loop.exit();
                }
            }

            _ => (),
        }
    }
}

/// Apply the standard surface-error policy: resize on `Lost`/`Outdated`,
/// log anything else.
fn handle_render(
    result: Result<(), wgpu::SurfaceError>,
    mut resize: impl FnMut(u32, u32),
    window: Option<&Window>,
) {
    match result {
        Ok(()) => {}
        Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
            if let Some(w) = window {
                let (width, height) = surface_size(w.inner_size());
                resize(width, height);
            }
        }
        Err(e) => {
            log::error!("render error: {e:?}");
        }
    }
}
