//! Central GPU and window context.
//!
//! Owns the surface, device, queue, surface configuration, depth texture and
//! camera resources, and implements the resize policy: the drawable is kept
//! at the window's size with the device pixel ratio clamped to 2 to bound
//! fill-rate cost.

use std::sync::Arc;

use anyhow::anyhow;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    camera::{Camera, CameraResources, OrbitController, Projection},
    texture::Texture,
};

/// Device pixel ratios above this are clamped down.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// The pixel ratio actually used for the drawable.
///
/// For device ratios {1, 1.5, 2, 3, 4} this yields {1, 1.5, 2, 2, 2}.
pub fn clamped_pixel_ratio(scale_factor: f64) -> f64 {
    scale_factor.min(MAX_PIXEL_RATIO)
}

/// Map a physical window size onto the drawable size under the ratio clamp.
///
/// Window sizes already include the full device pixel ratio, so sizes only
/// shrink when the device ratio exceeds [`MAX_PIXEL_RATIO`].
pub fn surface_extent(size: PhysicalSize<u32>, scale_factor: f64) -> PhysicalSize<u32> {
    if scale_factor <= MAX_PIXEL_RATIO {
        return size;
    }
    let ratio = clamped_pixel_ratio(scale_factor) / scale_factor;
    PhysicalSize::new(
        (size.width as f64 * ratio).round() as u32,
        (size.height as f64 * ratio).round() as u32,
    )
}

#[derive(Debug)]
pub struct Context {
    pub window: Arc<Window>,
    pub depth_texture: Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let window_size = window.inner_size();
        let size = surface_extent(window_size, window.scale_factor());

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No suitable GPU adapter found"))?;

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    // WebGL doesn't support all of wgpu's features, so if
                    // we're building for the web we'll have to disable some.
                    required_limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default()
                    },
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        log::info!("Surface");
        let surface_caps = surface.get_capabilities(&adapter);
        // The shader assumes an sRGB surface texture; fall back to whatever
        // the platform offers if none is available.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // Camera starts on the +Z axis, five units from the origin it orbits.
        let camera = Camera::new((0.0, 0.0, 0.0), cgmath::Deg(90.0), cgmath::Deg(0.0), 5.0);
        let projection = Projection::new(
            window_size.width.max(1),
            window_size.height.max(1),
            cgmath::Deg(75.0),
            0.1,
            1000.0,
        );
        let controller = OrbitController::new(0.004, 0.5);
        let camera = CameraResources::new(&device, camera, controller, &projection);

        let depth_texture =
            Texture::create_depth_texture(&device, [config.width, config.height], "depth_texture");

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
        })
    }

    /// Apply a new window size: re-clamp the pixel ratio, reconfigure the
    /// surface, refresh the projection aspect from the window size and
    /// rebuild the depth texture.
    pub fn resize(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let extent = surface_extent(size, scale_factor);
        self.config.width = extent.width;
        self.config.height = extent.height;
        // The aspect follows the window itself; the ratio clamp only shrinks
        // the drawable, and its rounding must not leak into the projection.
        self.projection.resize(size.width, size.height);
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            "depth_texture",
        );
    }
}
