//! Orbit camera, perspective projection and the camera uniform.
//!
//! The camera orbits a fixed target: pointer drags change yaw/pitch, the
//! scroll wheel changes the orbit radius, and an exponential damping factor
//! smooths both out over the following frames.

use std::time::Duration;

use cgmath::{Matrix4, Point3, Rad, Vector3, perspective};
use wgpu::util::DeviceExt;
use winit::event::MouseScrollDelta;

/// Converts the OpenGL clip-space depth range (-1..1) to WGPU's (0..1).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Exponential decay applied to the orbit velocity once per frame.
pub const DAMPING_FACTOR: f32 = 0.05;

/// Shortest allowed orbit radius; zooming stops here.
const MIN_RADIUS: f32 = 0.5;

/// Keep the pitch just short of the poles so the view never flips.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Camera state expressed as an orbit around a target point.
///
/// The world transform is derived from yaw/pitch/radius; the default scene
/// starts at the equivalent of position (0, 0, 5) looking at the origin.
#[derive(Debug)]
pub struct Camera {
    pub target: Point3<f32>,
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub radius: f32,
}

impl Camera {
    pub fn new<T, Y, P>(target: T, yaw: Y, pitch: P, radius: f32) -> Self
    where
        T: Into<Point3<f32>>,
        Y: Into<Rad<f32>>,
        P: Into<Rad<f32>>,
    {
        Self {
            target: target.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
            radius,
        }
    }

    /// World-space eye position on the orbit sphere.
    pub fn position(&self) -> Point3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        self.target
            + Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw) * self.radius
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position(), self.target, Vector3::unit_y())
    }
}

/// Perspective projection parameters.
///
/// The aspect ratio must always match the current drawable dimensions; the
/// resize handler keeps it current.
#[derive(Debug)]
pub struct Projection {
    pub aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Maps pointer drags and wheel scrolls onto the orbit parameters.
///
/// Input accumulates into a velocity which [`update`](Self::update) applies
/// and then decays by [`DAMPING_FACTOR`], so the camera keeps gliding briefly
/// after the pointer stops.
#[derive(Debug)]
pub struct OrbitController {
    rotate_speed: f32,
    zoom_speed: f32,
    velocity_yaw: f32,
    velocity_pitch: f32,
    velocity_zoom: f32,
}

impl OrbitController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            velocity_yaw: 0.0,
            velocity_pitch: 0.0,
            velocity_zoom: 0.0,
        }
    }

    /// Feed a relative pointer motion (pixels) while the drag button is held.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.velocity_yaw += dx as f32 * self.rotate_speed;
        self.velocity_pitch += dy as f32 * self.rotate_speed;
    }

    pub fn handle_scroll(&mut self, delta: &MouseScrollDelta) {
        self.velocity_zoom += match delta {
            MouseScrollDelta::LineDelta(_, lines) => lines * self.zoom_speed,
            MouseScrollDelta::PixelDelta(position) => {
                position.y as f32 * 0.005 * self.zoom_speed
            }
        };
    }

    /// Apply the accumulated velocity to the camera, then damp it.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        camera.yaw += Rad(self.velocity_yaw * dt);
        let pitch = (camera.pitch.0 + self.velocity_pitch * dt).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        camera.pitch = Rad(pitch);
        camera.radius = (camera.radius - self.velocity_zoom).max(MIN_RADIUS);

        let decay = 1.0 - DAMPING_FACTOR;
        self.velocity_yaw *= decay;
        self.velocity_pitch *= decay;
        self.velocity_zoom = 0.0;
    }
}

/// The camera data uploaded to the GPU every frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_proj = (projection.calc_matrix() * camera.view_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

pub fn camera_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("camera_bind_group_layout"),
    })
}

/// Camera, controller and the GPU-side resources bundled together.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(
        device: &wgpu::Device,
        camera: Camera,
        controller: OrbitController,
        projection: &Projection,
    ) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = camera_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controller,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}
