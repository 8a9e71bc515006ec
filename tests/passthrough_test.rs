//! Headless render check: the plane must show the texture's colour untouched.
//!
//! Runs only with `--features integration-tests` since it needs a GPU adapter.

#![cfg(feature = "integration-tests")]

use cgmath::Deg;
use vantage::camera::{Camera, CameraResources, OrbitController, Projection};
use vantage::mesh::Plane;
use vantage::scene::{AmbientLight, DrawScene, Scene};
use vantage::texture::Texture;

const TARGET_SIZE: u32 = 256;
const TEXEL: [u8; 4] = [40, 90, 200, 255];

async fn request_headless_device() -> (wgpu::Device, wgpu::Queue) {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .expect("no GPU adapter available");
    adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        )
        .await
        .expect("failed to acquire device")
}

async fn render_scene_once() -> Vec<u8> {
    let (device, queue) = request_headless_device().await;

    let solid = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        8,
        8,
        image::Rgba(TEXEL),
    ));
    let texture = Texture::from_image(&device, &queue, &solid, Some("solid")).unwrap();

    let camera = Camera::new((0.0, 0.0, 0.0), Deg(90.0), Deg(0.0), 5.0);
    let projection = Projection::new(TARGET_SIZE, TARGET_SIZE, Deg(75.0), 0.1, 1000.0);
    let controller = OrbitController::new(0.004, 0.5);
    let camera = CameraResources::new(&device, camera, controller, &projection);

    let ambient = AmbientLight::new(&device, [1.0, 1.0, 1.0], 0.5);
    let plane = Plane::new(
        &device,
        wgpu::TextureFormat::Rgba8UnormSrgb,
        &camera.bind_group_layout,
        &ambient.bind_group_layout,
        texture,
        (TARGET_SIZE, TARGET_SIZE),
    );
    let scene = Scene { ambient, plane };

    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("render target"),
        size: wgpu::Extent3d {
            width: TARGET_SIZE,
            height: TARGET_SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());
    let depth = Texture::create_depth_texture(&device, [TARGET_SIZE, TARGET_SIZE], "test depth");

    let bytes_per_row = 4 * TARGET_SIZE;
    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback"),
        size: (bytes_per_row * TARGET_SIZE) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("test encoder"),
    });
    {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("test pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &target_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 1.0,
                        g: 1.0,
                        b: 1.0,
                        a: 0.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.draw_scene(&scene, &camera.bind_group);
    }
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture: &target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &readback,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(TARGET_SIZE),
            },
        },
        wgpu::Extent3d {
            width: TARGET_SIZE,
            height: TARGET_SIZE,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let slice = readback.slice(..);
    let (sender, receiver) = futures_intrusive::channel::shared::oneshot_channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        sender.send(result).unwrap();
    });
    device.poll(wgpu::Maintain::Wait).panic_on_timeout();
    receiver.receive().await.unwrap().unwrap();

    let pixels = slice.get_mapped_range().to_vec();
    readback.unmap();
    pixels
}

fn pixel_at(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
    let offset = ((y * TARGET_SIZE + x) * 4) as usize;
    pixels[offset..offset + 4].try_into().unwrap()
}

#[test]
fn plane_shows_the_texture_colour_unmodified() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let pixels = runtime.block_on(render_scene_once());

    // The plane fills the middle of the viewport; the sampled colour must
    // survive the passthrough shader within rounding.
    let center = pixel_at(&pixels, TARGET_SIZE / 2, TARGET_SIZE / 2);
    for (channel, (got, want)) in center.iter().zip(TEXEL.iter()).enumerate() {
        assert!(
            (*got as i16 - *want as i16).abs() <= 1,
            "channel {} was {} expected {} (center {:?})",
            channel,
            got,
            want,
            center
        );
    }

    // The corners lie outside the plane and keep the clear colour.
    let corner = pixel_at(&pixels, 2, 2);
    assert_eq!(&corner[..3], &[255, 255, 255]);
    assert_eq!(corner[3], 0);
}
