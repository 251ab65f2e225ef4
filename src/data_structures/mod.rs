//! Scene data structures: materials, lights, transforms and textures.
//!
//! - `material` holds the named surface materials and their library
//! - `light` holds the directional, point and spot lights of the scene
//! - `transform` builds model matrices from scale, rotation and translation
//! - `texture` is the GPU texture wrapper with its mip chain and sampler

pub mod light;
pub mod material;
pub mod texture;
pub mod transform;
