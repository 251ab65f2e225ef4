//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around WGPU GPU texture resources
//! together with its view and sampler. Scene textures are uploaded with a full
//! mip chain so distant surfaces sample a filtered level instead of aliasing.

use image::imageops::{self, FilterType};

use crate::resources::texture::LoadedImage;

/// A GPU texture with a view and optional sampler.
///
/// Created from a decoded [`LoadedImage`] via [`from_loaded`](Self::from_loaded).
/// Cloning is cheap: the underlying WGPU objects are reference counted.
#[derive(Clone, Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
    pub mip_level_count: u32,
}

impl Texture {
    /// Colour format used for every scene texture. Texels are linear, with no
    /// sRGB decode on sampling.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Upload a decoded image and all of its mip levels.
    ///
    /// WGPU has no three-channel 8-bit formats, so RGB images are expanded
    /// to RGBA with an opaque alpha before upload. Mip levels are generated on
    /// the CPU by repeated halving with a triangle filter.
    pub fn from_loaded(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &LoadedImage,
        label: Option<&str>,
    ) -> Self {
        let (width, height) = image.dimensions();
        let mip_level_count = mip_level_count(width, height);

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let mut level = image.to_rgba8();
        for mip_level in 0..mip_level_count {
            let (level_width, level_height) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level,
                    origin: wgpu::Origin3d::ZERO,
                },
                &level,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level_width),
                    rows_per_image: Some(level_height),
                },
                wgpu::Extent3d {
                    width: level_width,
                    height: level_height,
                    depth_or_array_layers: 1,
                },
            );
            if mip_level + 1 < mip_level_count {
                level = imageops::resize(
                    &level,
                    (level_width / 2).max(1),
                    (level_height / 2).max(1),
                    FilterType::Triangle,
                );
            }
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(create_default_sampler(device));

        Self {
            texture,
            view,
            sampler,
            mip_level_count,
        }
    }
}

/// Number of levels in a full mip chain down to 1x1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Repeat wrapping with linear filtering on every axis and between mips.
pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    })
}
