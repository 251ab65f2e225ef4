use std::{
    io::Cursor,
    path::Path,
};

use image::{DynamicImage, GenericImageView, ImageReader};

use crate::{
    data_structures::texture::Texture,
    resources::registry::TextureBackend,
};

/// Reasons an image file cannot become a scene texture.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("not implemented to handle image with {0} channels")]
    UnsupportedChannels(u8),
}

/// A decoded image that is ready for upload.
///
/// Only 8-bit RGB and RGBA images exist as `LoadedImage`s, and rows are
/// already flipped so that the first row is the bottom of the picture.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    image: DynamicImage,
    channels: u8,
}

impl LoadedImage {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// 3 for RGB, 4 for RGBA.
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Tightly packed pixel rows, `channels` bytes per pixel.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_bytes()
    }

    pub fn to_rgba8(&self) -> image::RgbaImage {
        self.image.to_rgba8()
    }
}

impl TryFrom<DynamicImage> for LoadedImage {
    type Error = ImageLoadError;

    fn try_from(image: DynamicImage) -> Result<Self, Self::Error> {
        let channels = image.color().channel_count();
        let image = match channels {
            3 => DynamicImage::ImageRgb8(image.flipv().to_rgb8()),
            4 => DynamicImage::ImageRgba8(image.flipv().to_rgba8()),
            other => return Err(ImageLoadError::UnsupportedChannels(other)),
        };
        Ok(Self { image, channels })
    }
}

/// Decode an in-memory image file. The format is sniffed from the content,
/// not from any file extension.
pub fn decode_image(bytes: &[u8]) -> Result<LoadedImage, ImageLoadError> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    LoadedImage::try_from(image)
}

/// Read and decode an image file from disk.
pub fn load_image(path: impl AsRef<Path>) -> Result<LoadedImage, ImageLoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let image = decode_image(&bytes)?;
    log::info!(
        "Successfully loaded image: {}, width: {}, height: {}, channels: {}",
        path.display(),
        image.width(),
        image.height(),
        image.channels()
    );
    Ok(image)
}

/// Bind group layout for a single sampled scene texture.
pub fn texture_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("Scene texture_bind_group_layout"),
    })
}

/// A texture owned by [`GpuTextures`]. The id distinguishes handles when
/// they are unbound from their texture unit.
#[derive(Clone, Debug)]
pub struct GpuTexture {
    pub id: u32,
    pub texture: Texture,
}

/// WGPU implementation of the texture backend.
///
/// Texture units are modelled as a table of optional textures indexed by
/// unit; a host builds the bind group for the unit a draw samples from.
#[derive(Debug)]
pub struct GpuTextures {
    device: wgpu::Device,
    queue: wgpu::Queue,
    units: Vec<Option<GpuTexture>>,
    next_id: u32,
}

impl GpuTextures {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            device,
            queue,
            units: Vec::new(),
            next_id: 0,
        }
    }

    /// Texture currently bound to `unit`.
    pub fn unit(&self, unit: usize) -> Option<&GpuTexture> {
        self.units.get(unit).and_then(Option::as_ref)
    }

    /// Bind group for the texture bound to `unit`, using [`texture_layout`].
    pub fn bind_group(&self, layout: &wgpu::BindGroupLayout, unit: usize) -> Option<wgpu::BindGroup> {
        let bound = self.unit(unit)?;
        let sampler = bound.texture.sampler.as_ref()?;
        Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&bound.texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some("Scene texture_bind_group"),
        }))
    }
}

impl TextureBackend for GpuTextures {
    type Handle = GpuTexture;

    fn create(&mut self, image: &LoadedImage, label: &str) -> GpuTexture {
        let id = self.next_id;
        self.next_id += 1;
        GpuTexture {
            id,
            texture: Texture::from_loaded(&self.device, &self.queue, image, Some(label)),
        }
    }

    fn bind(&mut self, unit: usize, handle: &GpuTexture) {
        if self.units.len() <= unit {
            self.units.resize(unit + 1, None);
        }
        self.units[unit] = Some(handle.clone());
    }

    fn destroy(&mut self, handle: GpuTexture) {
        for unit in self.units.iter_mut() {
            if unit.as_ref().is_some_and(|bound| bound.id == handle.id) {
                *unit = None;
            }
        }
        handle.texture.texture.destroy();
    }
}
