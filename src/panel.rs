//! Debug panel drawn as an egui overlay.
//!
//! A side container for runtime-adjustable parameters. It currently holds a
//! single empty "Objects" group; controls get bound here as scene objects
//! grow tweakable parameters.

use egui::viewport::ViewportId;
use egui_wgpu::{Renderer as EguiRenderer, ScreenDescriptor};
use egui_winit::State as EguiWinitState;
use winit::{event::WindowEvent, window::Window};

pub struct DebugPanel {
    ctx: egui::Context,
    state: EguiWinitState,
    renderer: EguiRenderer,
}

impl DebugPanel {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let ctx = egui::Context::default();
        let state = EguiWinitState::new(ctx.clone(), ViewportId::ROOT, window, None, None, None);
        let renderer = EguiRenderer::new(device, surface_format, None, 1, false);
        Self {
            ctx,
            state,
            renderer,
        }
    }

    /// Offer a window event to the panel; returns true when consumed.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Run the panel UI and composite it over the frame.
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        config: &wgpu::SurfaceConfiguration,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::SidePanel::right("debug_panel")
                .resizable(false)
                .show(ctx, |ui| {
                    egui::CollapsingHeader::new("Objects")
                        .default_open(true)
                        .show(ui, |_ui| {});
                });
        });
        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let screen_desc = ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: self.ctx.pixels_per_point(),
        };
        self.renderer
            .update_buffers(device, queue, encoder, &paint_jobs, &screen_desc);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panel Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let mut render_pass = render_pass.forget_lifetime();
            self.renderer
                .render(&mut render_pass, &paint_jobs, &screen_desc);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
