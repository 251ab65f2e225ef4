#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn uploads_scene_textures_and_uniforms() {
    use futures::executor::block_on;
    use still_life::{
        context::request_device,
        pipelines::uniforms::{ShaderUniforms, UniformBuffers},
        resources::{GpuTextures, TextureRegistry, texture::texture_layout},
        shader::{Uniform, UniformSink},
    };

    use crate::common::test_utils::{fixture_dir, init_logger, write_rgb, write_rgba};

    init_logger();
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        ..Default::default()
    });
    let (device, queue) = block_on(request_device(&instance, None)).unwrap();

    let dir = fixture_dir("gpu");
    write_rgba(&dir.path().join("ceramic.png"), 4, 4);
    write_rgb(&dir.path().join("woodtable.png"), 8, 2);

    let mut gpu = GpuTextures::new(device.clone(), queue.clone());
    let mut registry = TextureRegistry::new();
    registry.register(&mut gpu, dir.path().join("ceramic.png"), "teapot").unwrap();
    registry.register(&mut gpu, dir.path().join("woodtable.png"), "table").unwrap();
    registry.bind_all(&mut gpu);

    assert_eq!(gpu.unit(0).unwrap().texture.mip_level_count, 3);
    assert_eq!(
        gpu.unit(0).unwrap().texture.texture.format(),
        wgpu::TextureFormat::Rgba8Unorm
    );
    assert_eq!(gpu.unit(1).unwrap().texture.mip_level_count, 4);
    let layout = texture_layout(&device);
    assert!(gpu.bind_group(&layout, 1).is_some());
    assert!(gpu.bind_group(&layout, 2).is_none());

    let mut uniforms = ShaderUniforms::new();
    let buffers = UniformBuffers::new(&device, &uniforms);
    uniforms.set_sampler(Uniform::ObjectTexture, 1);
    buffers.write(&queue, &uniforms);
    queue.submit([]);

    assert_eq!(registry.release(&mut gpu), 2);
    assert!(gpu.unit(0).is_none());
    assert!(gpu.unit(1).is_none());
}
