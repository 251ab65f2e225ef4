/**
 * This module contains all logic for loading textures from image files and
 * keeping the resulting GPU resources addressable by tag.
 */
pub mod registry;
pub mod texture;

pub use registry::{MISSING_SLOT, RegistryError, TEXTURE_UNIT_CAPACITY, TextureBackend, TextureEntry, TextureRegistry};
pub use texture::{GpuTexture, GpuTextures, ImageLoadError, LoadedImage, decode_image, load_image};
