//! still-life
//!
//! A small 3D still-life scene: a table with a percolator, a coffee cup, a
//! stack of books, a serving tray and a flower pot, lit by a directional, two
//! point and one spot light. The crate owns the scene description and drives
//! an external shader and mesh collaborator through narrow traits, so it can
//! render through WGPU or be inspected without a GPU at all.
//!
//! High-level modules
//! - `camera`: fly camera, view presets and the keyboard controller
//! - `config`: scene configuration and environment overrides
//! - `context`: composition root that wires camera, shader and scene together
//! - `data_structures`: materials, lights, model transforms and GPU textures
//! - `mesh`: the primitive shape catalogue and the mesh collaborator trait
//! - `pipelines`: uniform blocks and buffers for the WGPU renderer
//! - `resources`: image loading and the texture registry
//! - `scene`: the scene manager that prepares and renders the still-life
//! - `shader`: uniform names and the shader state façade
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod mesh;
pub mod pipelines;
pub mod resources;
pub mod scene;
pub mod shader;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
