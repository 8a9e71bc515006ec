//! The scene environment: asset gate, scene construction and pointer state.
//!
//! Construction is the one asynchronous step in the whole program: the
//! texture must be fully loaded before any scene object exists. After that
//! everything is driven synchronously by window events and the redraw loop.

use instant::Instant;
use winit::dpi::{PhysicalPosition, PhysicalSize};

use crate::{
    assets,
    camera::{Camera, Projection},
    context::Context,
    pick::{self, PointerNdc, Raycaster},
    scene::Scene,
};

/// Monotonic clock started at scene construction.
///
/// The elapsed time would feed the material's time uniform; that feed is not
/// active, so nothing reads it yet.
#[derive(Debug)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    #[allow(dead_code)]
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

#[derive(Debug)]
pub struct Environment {
    pub scene: Scene,
    pub raycaster: Raycaster,
    pub pointer: PointerNdc,
    #[allow(unused)]
    clock: Clock,
}

impl Environment {
    /// Load the texture, then build the scene around it.
    ///
    /// The await is the gate: no scene state is constructed until the
    /// texture is decoded and uploaded. A load failure propagates up and
    /// leaves the environment unbuilt.
    pub async fn load(ctx: &Context, texture_path: &str) -> anyhow::Result<Self> {
        let texture = assets::load_texture(texture_path, &ctx.device, &ctx.queue).await?;
        let scene = Scene::new(ctx, texture);
        Ok(Self {
            scene,
            raycaster: Raycaster::new(),
            pointer: PointerNdc::default(),
            clock: Clock::new(),
        })
    }

    /// Track the pointer in normalized device coordinates and re-aim the ray
    /// caster. Nothing consumes the ray yet.
    pub fn on_pointer_move(
        &mut self,
        position: PhysicalPosition<f64>,
        size: PhysicalSize<u32>,
        camera: &Camera,
        projection: &Projection,
    ) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.pointer = pick::to_ndc(
            position.x,
            position.y,
            size.width as f64,
            size.height as f64,
        );
        self.raycaster
            .set_from_camera(self.pointer, camera, projection);
    }

    /// Forward the drawable size to the material's resolution uniform.
    pub fn set_resolution(&mut self, queue: &wgpu::Queue, width: u32, height: u32) {
        self.scene.plane.material.set_resolution(queue, width, height);
    }
}
