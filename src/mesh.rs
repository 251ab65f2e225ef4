//! Basic shape meshes.
//!
//! The scene is assembled entirely from a small catalogue of primitive
//! shapes. Tessellating and drawing them belongs to whoever implements
//! [`ShapeMeshes`]; the scene only asks for a shape to be loaded once and
//! drawn with whatever uniforms are current at the time of the call. Those
//! per-object uniforms come along with every draw as a [`DrawState`].

use std::collections::HashSet;

use crate::shader::DrawState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Plane,
    Cylinder,
    TaperedCylinder,
    Torus,
    Sphere,
    Cone,
    Box,
    Pyramid3,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Plane,
        ShapeKind::Cylinder,
        ShapeKind::TaperedCylinder,
        ShapeKind::Torus,
        ShapeKind::Sphere,
        ShapeKind::Cone,
        ShapeKind::Box,
        ShapeKind::Pyramid3,
    ];
}

/// Which parts of a cylinder-like shape to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CylinderParts {
    pub top: bool,
    pub bottom: bool,
    pub sides: bool,
}

impl Default for CylinderParts {
    fn default() -> Self {
        Self {
            top: true,
            bottom: true,
            sides: true,
        }
    }
}

/// A single draw request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Plane,
    Cylinder(CylinderParts),
    TaperedCylinder(CylinderParts),
    Torus,
    Sphere,
    Cone,
    Box,
    Pyramid3,
}

impl Shape {
    pub fn cylinder() -> Self {
        Shape::Cylinder(CylinderParts::default())
    }

    pub fn tapered_cylinder() -> Self {
        Shape::TaperedCylinder(CylinderParts::default())
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Plane => ShapeKind::Plane,
            Shape::Cylinder(_) => ShapeKind::Cylinder,
            Shape::TaperedCylinder(_) => ShapeKind::TaperedCylinder,
            Shape::Torus => ShapeKind::Torus,
            Shape::Sphere => ShapeKind::Sphere,
            Shape::Cone => ShapeKind::Cone,
            Shape::Box => ShapeKind::Box,
            Shape::Pyramid3 => ShapeKind::Pyramid3,
        }
    }
}

/// The mesh collaborator the scene draws through.
pub trait ShapeMeshes {
    /// Build the GPU mesh for `kind`. Called once per kind while preparing.
    fn load(&mut self, kind: ShapeKind);

    /// Called once at the start of every rendered frame, before any draw.
    fn begin_frame(&mut self) {}

    /// Issue one draw call. `state` holds the per-object uniforms that are
    /// current on the shader for this call.
    fn draw(&mut self, shape: Shape, state: &DrawState);
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDraw {
    pub shape: Shape,
    pub state: DrawState,
}

/// A [`ShapeMeshes`] that records the draws of the current frame.
///
/// Useful to inspect a frame, or as the collaborator for a host that replays
/// the recorded draws itself: apply each [`DrawState`] to the shader, upload,
/// then draw the shape.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    loaded: HashSet<ShapeKind>,
    draws: Vec<RecordedDraw>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self, kind: ShapeKind) -> bool {
        self.loaded.contains(&kind)
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn shapes(&self) -> Vec<Shape> {
        self.draws.iter().map(|draw| draw.shape).collect()
    }

    pub fn clear(&mut self) {
        self.draws.clear();
    }
}

impl ShapeMeshes for DrawList {
    fn load(&mut self, kind: ShapeKind) {
        self.loaded.insert(kind);
    }

    fn begin_frame(&mut self) {
        self.clear();
    }

    fn draw(&mut self, shape: Shape, state: &DrawState) {
        if !self.is_loaded(shape.kind()) {
            log::warn!("Skipping draw of {:?}: mesh was never loaded", shape.kind());
            return;
        }
        self.draws.push(RecordedDraw {
            shape,
            state: state.clone(),
        });
    }
}
