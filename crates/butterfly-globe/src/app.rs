//! Desktop window hosting the globe

use crate::globe::Globe;
use crate::gpu::WgpuBackend;
use crate::textures::{generate_texture_set, PlanetTextureSet, TextureParams};
use butterfly_core::config::GlobeConfig;
use butterfly_core::{ButterflyError, Result};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

pub const WINDOW_TITLE: &str = "Butterfly Earth";

/// Pixels of trackpad scroll treated as one wheel notch
const PIXELS_PER_NOTCH: f64 = 50.0;

struct GlobeApp {
    config: GlobeConfig,
    window: Option<Arc<Window>>,
    globe: Option<Globe<WgpuBackend>>,
    pending: Option<Receiver<PlanetTextureSet>>,
    dragging: bool,
    cursor: Option<PhysicalPosition<f64>>,
}

impl GlobeApp {
    fn new(config: GlobeConfig) -> Self {
        Self {
            config,
            window: None,
            globe: None,
            pending: None,
            dragging: false,
            cursor: None,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| ButterflyError::RenderError(format!("window creation: {}", e)))?,
        );

        let backend = pollster::block_on(WgpuBackend::new(window.clone()))?;
        let size = window.inner_size();
        let params = TextureParams::from_config(&self.config);
        let globe = Globe::new(backend, params, size.width.max(1), size.height.max(1))?;

        // Maps are generated off the event loop and applied when they land
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let set = generate_texture_set(&params);
            // The receiver is gone if the window closed first
            let _ = tx.send(set);
        });

        self.pending = Some(rx);
        self.globe = Some(globe);
        self.window = Some(window);
        Ok(())
    }

    fn poll_textures(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(set) => {
                if let Some(globe) = self.globe.as_mut() {
                    globe.apply_textures(&set);
                }
                self.pending = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::error!("Texture generation ended without producing maps");
                self.pending = None;
            }
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.pending = None;
        if let Some(mut globe) = self.globe.take() {
            globe.unmount();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for GlobeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                log::error!("Failed to initialize globe: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.close(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(globe) = self.globe.as_mut() {
                    globe.resize(size.width, size.height);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last), Some(globe)) =
                    (self.dragging, self.cursor, self.globe.as_mut())
                {
                    globe.on_drag((position.x - last.x) as f32, (position.y - last.y) as f32);
                }
                self.cursor = Some(position);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_NOTCH) as f32,
                };
                if let Some(globe) = self.globe.as_mut() {
                    globe.on_scroll(steps);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(globe) = self.globe.as_mut() {
                    globe.frame();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.poll_textures();
        if let (Some(window), Some(globe)) = (&self.window, &self.globe) {
            if globe.is_animating() {
                window.request_redraw();
            }
        }
    }
}

/// Open the globe window and block until it is closed
pub fn run_window(config: &GlobeConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|e| ButterflyError::RenderError(format!("event loop: {}", e)))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GlobeApp::new(config.clone());
    event_loop
        .run_app(&mut app)
        .map_err(|e| ButterflyError::RenderError(format!("event loop: {}", e)))?;
    Ok(())
}
