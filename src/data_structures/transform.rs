//! Per-object model transforms.
//!
//! Every scene object is placed by a scale, three Euler rotations in degrees
//! and a translation. These are composed into a single model matrix as
//! `T * Rz * Ry * Rx * S`: scale first, then rotate about X, Y and Z in that
//! order, then translate. The layout of the whole scene depends on this order.

use cgmath::{Deg, Matrix4, Vector3};

/// Scale, rotation and translation of one scene object.
///
/// Consumed immediately to produce a model matrix; nothing keeps these around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelTransform {
    pub scale: Vector3<f32>,
    /// Rotation about X, Y and Z in degrees.
    pub rotation: [f32; 3],
    pub translation: Vector3<f32>,
}

impl ModelTransform {
    /// Identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: [0.0; 3],
            translation: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// Scaled and translated, without rotation.
    pub fn placed(scale: [f32; 3], translation: [f32; 3]) -> Self {
        Self {
            scale: scale.into(),
            rotation: [0.0; 3],
            translation: translation.into(),
        }
    }

    pub fn rotated(mut self, x_degrees: f32, y_degrees: f32, z_degrees: f32) -> Self {
        self.rotation = [x_degrees, y_degrees, z_degrees];
        self
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        let [x, y, z] = self.rotation;
        build_model_matrix(self.scale, x, y, z, self.translation)
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ModelTransform> for Matrix4<f32> {
    fn from(transform: ModelTransform) -> Self {
        transform.to_matrix()
    }
}

/// Compose `T * Rz * Ry * Rx * S` from degrees.
pub fn build_model_matrix(
    scale: Vector3<f32>,
    x_rotation_degrees: f32,
    y_rotation_degrees: f32,
    z_rotation_degrees: f32,
    translation: Vector3<f32>,
) -> Matrix4<f32> {
    Matrix4::from_translation(translation)
        * Matrix4::from_angle_z(Deg(z_rotation_degrees))
        * Matrix4::from_angle_y(Deg(y_rotation_degrees))
        * Matrix4::from_angle_x(Deg(x_rotation_degrees))
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}
