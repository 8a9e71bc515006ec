//! Application event loop.
//!
//! Drives the whole viewer: asynchronous initialization (GPU context, then
//! texture, then scene), window and device event routing, and the continuous
//! per-frame render. The loop runs until the window closes; there is no
//! other stop condition.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and kicks off initialization
//! 2. Initialization completes (inline on native, via a user event on wasm)
//! 3. Window events update the camera controller, pointer state and panel
//! 4. Each `RedrawRequested` applies the damped orbit update, uploads the
//!    camera uniform, draws the scene and the panel overlay, and requests
//!    the next frame

use std::{iter, sync::Arc};

use instant::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{context::Context, environment::Environment, panel::DebugPanel, scene::DrawScene};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// White with zero alpha, so the page background can show through on web.
const CLEAR_COLOUR: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 0.0,
};

/// Gates rendering on surface configuration.
///
/// The surface is only configured by the first resize after initialization
/// completes, so no frame can be drawn before the scene and its texture
/// exist. Zero-sized resizes keep the gate closed.
#[derive(Debug, Default)]
pub struct SurfaceGate {
    configured: bool,
}

impl SurfaceGate {
    /// Accept or reject a resize; the gate opens on the first accepted one.
    pub fn configure(&mut self, size: PhysicalSize<u32>) -> bool {
        if size.width == 0 || size.height == 0 {
            return false;
        }
        self.configured = true;
        true
    }

    /// Whether a frame may be drawn.
    pub fn is_open(&self) -> bool {
        self.configured
    }
}

/// Fully initialized application state: GPU context, scene and panel.
pub struct AppState {
    pub ctx: Context,
    pub env: Environment,
    panel: DebugPanel,
    gate: SurfaceGate,
    mouse_pressed: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, texture_path: &str) -> Self {
        let ctx = match Context::new(window).await {
            Ok(ctx) => ctx,
            Err(e) => panic!(
                "App initialization failed. Cannot create the main context: {}",
                e
            ),
        };
        // The texture gate: the scene is only built once the asset is in.
        let env = match Environment::load(&ctx, texture_path).await {
            Ok(env) => env,
            Err(e) => panic!(
                "App initialization failed. Cannot load the scene texture: {}",
                e
            ),
        };
        let panel = DebugPanel::new(&ctx.device, ctx.config.format, &ctx.window);
        Self {
            ctx,
            env,
            panel,
            gate: SurfaceGate::default(),
            mouse_pressed: false,
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if !self.gate.configure(size) {
            return;
        }
        let scale_factor = self.ctx.window.scale_factor();
        self.ctx.resize(size, scale_factor);
        self.env.set_resolution(
            &self.ctx.queue,
            self.ctx.config.width,
            self.ctx.config.height,
        );
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        // Keep the continuous loop going.
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured, which only
        // happens after initialization completed.
        if !self.gate.is_open() {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.ctx
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Render Encoder"),
                });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOUR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.draw_scene(&self.env.scene, &self.ctx.camera.bind_group);
        }

        self.panel.draw(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &self.ctx.window,
            &view,
            &self.ctx.config,
        );

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Event carrying the finished state from the async init on wasm.
pub enum AppEvent {
    Initialized(Box<AppState>),
}

impl std::fmt::Debug for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[allow(unused)]
    proxy: EventLoopProxy<AppEvent>,
    state: Option<AppState>,
    texture_path: String,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>, texture_path: String) -> Self {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().unwrap();
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            state: None,
            texture_path,
            last_time: Instant::now(),
        }
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("vantage");

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            // winit creates the canvas and appends it to the document body.
            window_attributes = window_attributes.with_append(true);
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        #[cfg(not(target_arch = "wasm32"))]
        {
            let state = self
                .async_runtime
                .block_on(AppState::new(window, &self.texture_path));
            self.state = Some(state);

            let state = self.state.as_mut().unwrap();
            let size = state.ctx.window.inner_size();
            state.resize(size);
            state.ctx.window.request_redraw();
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            let texture_path = self.texture_path.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = AppState::new(window, &texture_path).await;
                assert!(
                    proxy
                        .send_event(AppEvent::Initialized(Box::new(state)))
                        .is_ok()
                );
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                self.state = Some(*state);

                // Important: trigger a resize and redraw now that we are initialized
                let state = self.state.as_mut().unwrap();
                let size = state.ctx.window.inner_size();
                state.resize(size);
                state.ctx.window.request_redraw();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if state.mouse_pressed {
                state.ctx.camera.controller.handle_mouse(dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        // The panel gets first pick; consumed pointer events stay out of the
        // camera controls.
        let consumed = state.panel.on_window_event(&state.ctx.window, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = state.ctx.window.inner_size();
                state.resize(size);
            }
            WindowEvent::CursorMoved { position, .. } if !consumed => {
                let size = state.ctx.window.inner_size();
                state.env.on_pointer_move(
                    position,
                    size,
                    &state.ctx.camera.camera,
                    &state.ctx.projection,
                );
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } if !consumed => {
                state.mouse_pressed = button_state.is_pressed();
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                state.ctx.camera.controller.handle_scroll(&delta);
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                // Update the camera
                state
                    .ctx
                    .camera
                    .controller
                    .update(&mut state.ctx.camera.camera, dt);
                state
                    .ctx
                    .camera
                    .uniform
                    .update_view_proj(&state.ctx.camera.camera, &state.ctx.projection);
                state.ctx.queue.write_buffer(
                    &state.ctx.camera.buffer,
                    0,
                    bytemuck::cast_slice(&[state.ctx.camera.uniform]),
                );

                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Build the event loop and run the viewer until the window closes.
pub fn run(texture_path: &str) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, texture_path.to_string());
    event_loop.run_app(&mut app)?;
    Ok(())
}
