//! Tag-keyed texture registry.
//!
//! Scene code refers to textures by a human readable tag. The registry maps
//! each tag to the GPU handle it owns and to the texture unit ("slot") the
//! handle is bound to. Slots are handed out in registration order and never
//! change until the registry is released.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::resources::texture::{ImageLoadError, LoadedImage, load_image};

/// Number of texture units available to the scene shader.
pub const TEXTURE_UNIT_CAPACITY: usize = 16;

/// Slot value written to the shader for a tag that was never registered.
pub const MISSING_SLOT: i32 = -1;

/// The GPU side of texture management.
///
/// Implementations allocate a texture object for an uploaded image, attach it
/// to a numbered texture unit, and free it again. `destroy` takes the handle by
/// value so a freed handle cannot be used again.
pub trait TextureBackend {
    type Handle;

    /// Allocate a texture, upload the pixels and generate mipmaps.
    fn create(&mut self, image: &LoadedImage, label: &str) -> Self::Handle;

    /// Make `handle` the texture sampled from texture unit `unit`.
    fn bind(&mut self, unit: usize, handle: &Self::Handle);

    /// Free the GPU texture object.
    fn destroy(&mut self, handle: Self::Handle);
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("could not load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: ImageLoadError,
    },
    #[error("all {capacity} texture units are in use")]
    Capacity { capacity: usize },
    #[error("a texture is already registered under tag '{0}'")]
    DuplicateTag(String),
}

#[derive(Clone, Debug)]
pub struct TextureEntry<H> {
    pub tag: String,
    pub handle: H,
    pub slot: usize,
}

/// Capacity bounded, insertion ordered texture table with a tag index.
///
/// `entries[i].slot == i` always holds; `index` maps every tag to its slot.
#[derive(Debug)]
pub struct TextureRegistry<H> {
    entries: Vec<TextureEntry<H>>,
    index: HashMap<String, usize>,
    capacity: usize,
}

impl<H> TextureRegistry<H> {
    pub fn new() -> Self {
        Self::with_capacity(TEXTURE_UNIT_CAPACITY)
    }

    /// A registry limited to `capacity` textures, never more than
    /// [`TEXTURE_UNIT_CAPACITY`].
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(TEXTURE_UNIT_CAPACITY);
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &TextureEntry<H>> {
        self.entries.iter()
    }

    /// Load `path` and register it under `tag`. Returns the assigned slot.
    ///
    /// Capacity and tag uniqueness are checked before the file is touched. On
    /// any error the registry is left unchanged.
    pub fn register<B>(
        &mut self,
        backend: &mut B,
        path: impl AsRef<Path>,
        tag: &str,
    ) -> Result<usize, RegistryError>
    where
        B: TextureBackend<Handle = H>,
    {
        let path = path.as_ref();
        self.check_vacancy(tag)?;
        let image = load_image(path).map_err(|source| RegistryError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        self.insert(backend, &image, tag)
    }

    /// Register an already decoded image under `tag`.
    pub fn insert<B>(
        &mut self,
        backend: &mut B,
        image: &LoadedImage,
        tag: &str,
    ) -> Result<usize, RegistryError>
    where
        B: TextureBackend<Handle = H>,
    {
        self.check_vacancy(tag)?;
        let slot = self.entries.len();
        let handle = backend.create(image, tag);
        self.entries.push(TextureEntry {
            tag: tag.to_string(),
            handle,
            slot,
        });
        self.index.insert(tag.to_string(), slot);
        Ok(slot)
    }

    fn check_vacancy(&self, tag: &str) -> Result<(), RegistryError> {
        if self.is_full() {
            return Err(RegistryError::Capacity {
                capacity: self.capacity,
            });
        }
        if self.index.contains_key(tag) {
            return Err(RegistryError::DuplicateTag(tag.to_string()));
        }
        Ok(())
    }

    /// Bind every registered texture to the texture unit equal to its slot.
    pub fn bind_all<B>(&self, backend: &mut B)
    where
        B: TextureBackend<Handle = H>,
    {
        for entry in &self.entries {
            backend.bind(entry.slot, &entry.handle);
        }
    }

    pub fn lookup_slot(&self, tag: &str) -> Option<usize> {
        self.index.get(tag).copied()
    }

    /// Linear search over the slot table. Always agrees with
    /// [`lookup_slot`](Self::lookup_slot).
    pub fn scan_slot(&self, tag: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.tag == tag)
    }

    pub fn lookup_handle(&self, tag: &str) -> Option<&H> {
        self.lookup_slot(tag)
            .and_then(|slot| self.entries.get(slot))
            .map(|entry| &entry.handle)
    }

    /// Free every texture exactly once and empty the registry.
    ///
    /// Entries are drained before their handles are destroyed, so calling
    /// this again finds nothing to free. Returns the number of textures freed.
    pub fn release<B>(&mut self, backend: &mut B) -> usize
    where
        B: TextureBackend<Handle = H>,
    {
        self.index.clear();
        let mut freed = 0;
        for entry in self.entries.drain(..) {
            backend.destroy(entry.handle);
            freed += 1;
        }
        freed
    }
}

impl<H> Default for TextureRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
