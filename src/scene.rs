//! The scene graph root: one plane mesh and one ambient light.

use wgpu::util::DeviceExt;

use crate::{context::Context, mesh::Plane, texture::Texture};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AmbientLightUniform {
    pub color: [f32; 3],
    pub intensity: f32,
}

pub fn light_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
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
        label: Some("light_bind_group_layout"),
    })
}

/// A single ambient light uploaded once at scene construction.
#[derive(Debug)]
pub struct AmbientLight {
    pub uniform: AmbientLightUniform,
    #[allow(unused)]
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl AmbientLight {
    pub fn new(device: &wgpu::Device, color: [f32; 3], intensity: f32) -> Self {
        let uniform = AmbientLightUniform { color, intensity };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = light_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("light_bind_group"),
        });
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

/// Container of all renderable objects: here one mesh and one light.
#[derive(Debug)]
pub struct Scene {
    pub ambient: AmbientLight,
    pub plane: Plane,
}

impl Scene {
    /// Build the scene around an already-loaded texture.
    ///
    /// The light goes in first so its bind group layout exists when the
    /// plane's pipeline is assembled.
    pub fn new(ctx: &Context, texture: Texture) -> Self {
        let ambient = AmbientLight::new(&ctx.device, [1.0, 1.0, 1.0], 0.5);
        let plane = Plane::new(
            &ctx.device,
            ctx.config.format,
            &ctx.camera.bind_group_layout,
            &ambient.bind_group_layout,
            texture,
            (ctx.config.width, ctx.config.height),
        );
        Self { ambient, plane }
    }
}

/// Render-pass extension issuing the scene draw.
pub trait DrawScene<'a> {
    fn draw_scene(&mut self, scene: &'a Scene, camera_bind_group: &'a wgpu::BindGroup);
}

impl<'a, 'b> DrawScene<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_scene(&mut self, scene: &'b Scene, camera_bind_group: &'b wgpu::BindGroup) {
        let plane = &scene.plane;
        self.set_pipeline(&plane.material.pipeline);
        self.set_bind_group(0, &plane.material.texture_bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, &scene.ambient.bind_group, &[]);
        self.set_bind_group(3, &plane.material.params_bind_group, &[]);
        self.set_vertex_buffer(0, plane.vertex_buffer.slice(..));
        self.set_index_buffer(plane.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        self.draw_indexed(0..plane.num_elements, 0, 0..1);
    }
}
