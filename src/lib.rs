//! A small wgpu viewer: a textured subdivided plane, an orbit camera with
//! damped inertia, an ambient light and a ray caster tracking the pointer,
//! with an egui debug panel composited on top.
//!
//! # Module map
//!
//! - [`app`]: winit event loop and per-frame driver
//! - [`context`]: surface, device, queue and the pixel-ratio clamp
//! - [`environment`]: asset gate, scene construction, pointer state
//! - [`scene`]: scene container, ambient light, draw trait
//! - [`mesh`]: the subdivided plane geometry
//! - [`material`]: shader material, pipeline and its uniforms
//! - [`camera`]: orbit camera, projection and the damped controller
//! - [`pick`]: pointer normalization and ray casting
//! - [`panel`]: egui debug panel
//! - [`texture`]: GPU texture creation and upload
//! - [`assets`]: platform-aware asset loading

pub mod app;
pub mod assets;
pub mod camera;
pub mod context;
pub mod environment;
pub mod material;
pub mod mesh;
pub mod panel;
pub mod pick;
pub mod scene;
pub mod texture;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    app::run("textures/vibrant.png").map_err(|e| JsValue::from_str(&e.to_string()))
}
