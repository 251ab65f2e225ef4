//! GPU-side uniform storage for the scene shader.
//!
//! - `uniforms` packs named uniform writes into per-frame and per-object
//!   uniform blocks and uploads them to WGPU buffers

pub mod uniforms;
