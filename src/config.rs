//! Scene configuration.
//!
//! Everything tunable about the still-life lives in [`SceneConfig`]. The
//! defaults reproduce the fixed scene; `from_env` lets a host point the
//! texture loader at a different directory without recompiling.

use std::path::PathBuf;

use crate::resources::registry::TEXTURE_UNIT_CAPACITY;

/// Environment variable that overrides [`SceneConfig::texture_dir`].
pub const TEXTURE_DIR_ENV: &str = "STILL_LIFE_TEXTURE_DIR";

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Directory the scene texture files are resolved against.
    pub texture_dir: PathBuf,
    pub window_width: u32,
    pub window_height: u32,
    /// Number of texture units the registry may fill. Clamped to
    /// [`TEXTURE_UNIT_CAPACITY`].
    pub texture_capacity: usize,
}

impl SceneConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(TEXTURE_DIR_ENV) {
            log::info!("Using texture directory {:?} from {}", dir, TEXTURE_DIR_ENV);
            config.texture_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn with_texture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.texture_dir = dir.into();
        self
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.window_width.max(1) as f32 / self.window_height.max(1) as f32
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("textures"),
            window_width: 1000,
            window_height: 800,
            texture_capacity: TEXTURE_UNIT_CAPACITY,
        }
    }
}
