//! The flat-grid plane geometry.

use wgpu::util::DeviceExt;

use crate::{material::ShaderMaterial, texture::Texture};

/// Plane extent in world units on both axes.
pub const PLANE_SIZE: f32 = 10.0;
/// Grid subdivisions on both axes.
pub const PLANE_SEGMENTS: u32 = 10;
/// Fixed world offset placing the plane in front of the default camera.
pub const PLANE_OFFSET: [f32; 3] = [0.0, 0.0, -5.0];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl PlaneVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2, 2 => Float32x3];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlaneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Generate a flat grid centered at the origin in the XY plane, facing +Z.
///
/// Produces `(segments_x + 1) * (segments_y + 1)` vertices with uv coordinates
/// covering [0, 1]², and `segments_x * segments_y * 2` counter-clockwise
/// triangles.
pub fn plane_grid(
    width: f32,
    height: f32,
    segments_x: u32,
    segments_y: u32,
) -> (Vec<PlaneVertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(((segments_x + 1) * (segments_y + 1)) as usize);
    for j in 0..=segments_y {
        for i in 0..=segments_x {
            let u = i as f32 / segments_x as f32;
            let v = j as f32 / segments_y as f32;
            vertices.push(PlaneVertex {
                position: [(u - 0.5) * width, (v - 0.5) * height, 0.0],
                // v flipped so the image's top row lands at the top of the plane
                tex_coords: [u, 1.0 - v],
                normal: [0.0, 0.0, 1.0],
            });
        }
    }

    let stride = segments_x + 1;
    let mut indices = Vec::with_capacity((segments_x * segments_y * 6) as usize);
    for j in 0..segments_y {
        for i in 0..segments_x {
            let a = (j * stride + i) as u16;
            let b = a + 1;
            let c = a + stride as u16;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, d, a, d, c]);
        }
    }

    (vertices, indices)
}

/// The one mesh in the scene: the grid geometry paired with its material.
#[derive(Debug)]
pub struct Plane {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    pub material: ShaderMaterial,
}

impl Plane {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        light_layout: &wgpu::BindGroupLayout,
        texture: Texture,
        resolution: (u32, u32),
    ) -> Self {
        let (vertices, indices) =
            plane_grid(PLANE_SIZE, PLANE_SIZE, PLANE_SEGMENTS, PLANE_SEGMENTS);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Plane Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Plane Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let material = ShaderMaterial::new(
            device,
            color_format,
            camera_layout,
            light_layout,
            texture,
            cgmath::Matrix4::from_translation(PLANE_OFFSET.into()),
            resolution,
        );

        Self {
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
            material,
        }
    }
}
