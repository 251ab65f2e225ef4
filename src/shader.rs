//! Shader uniform names and the shader state façade.
//!
//! The scene shader is driven purely through named uniforms. The names are a
//! fixed contract with the shader source, so they are spelled exactly once,
//! in [`Uniform`], and everything else refers to them through the enum.
//!
//! [`ShaderState`] turns "draw the next object with this material, texture
//! and UV scale" into uniform writes, resolving tags through the texture
//! registry and material library. It also keeps the per-object values it has
//! written as a [`DrawState`], so a draw can carry the uniforms that were
//! current when it was issued.

use std::{fmt, str::FromStr};

use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

use crate::{
    data_structures::{
        material::{Material, MaterialLibrary},
        transform::ModelTransform,
    },
    resources::registry::{MISSING_SLOT, TextureRegistry},
};

/// Field of a light struct in the shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightField {
    Direction,
    Position,
    Ambient,
    Diffuse,
    Specular,
    Constant,
    Linear,
    Quadratic,
    CutOff,
    OuterCutOff,
    Active,
}

impl LightField {
    pub const ALL: [LightField; 11] = [
        LightField::Direction,
        LightField::Position,
        LightField::Ambient,
        LightField::Diffuse,
        LightField::Specular,
        LightField::Constant,
        LightField::Linear,
        LightField::Quadratic,
        LightField::CutOff,
        LightField::OuterCutOff,
        LightField::Active,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            LightField::Direction => "direction",
            LightField::Position => "position",
            LightField::Ambient => "ambient",
            LightField::Diffuse => "diffuse",
            LightField::Specular => "specular",
            LightField::Constant => "constant",
            LightField::Linear => "linear",
            LightField::Quadratic => "quadratic",
            LightField::CutOff => "cutOff",
            LightField::OuterCutOff => "outerCutOff",
            LightField::Active => "bActive",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialField {
    DiffuseColor,
    SpecularColor,
    Shininess,
}

impl MaterialField {
    pub const ALL: [MaterialField; 3] = [
        MaterialField::DiffuseColor,
        MaterialField::SpecularColor,
        MaterialField::Shininess,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            MaterialField::DiffuseColor => "diffuseColor",
            MaterialField::SpecularColor => "specularColor",
            MaterialField::Shininess => "shininess",
        }
    }
}

/// Every uniform the scene shader understands.
///
/// `Display` yields the exact GLSL name, e.g. `pointLights[1].position`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Uniform {
    Model,
    View,
    Projection,
    ViewPosition,
    ObjectColor,
    ObjectTexture,
    UseTexture,
    UseLighting,
    UvScale,
    Material(MaterialField),
    DirectionalLight(LightField),
    PointLight(usize, LightField),
    SpotLight(LightField),
}

impl Uniform {
    /// Name of a plain (non-struct) uniform.
    const fn plain_name(self) -> Option<&'static str> {
        match self {
            Uniform::Model => Some("model"),
            Uniform::View => Some("view"),
            Uniform::Projection => Some("projection"),
            Uniform::ViewPosition => Some("viewPosition"),
            Uniform::ObjectColor => Some("objectColor"),
            Uniform::ObjectTexture => Some("objectTexture"),
            Uniform::UseTexture => Some("bUseTexture"),
            Uniform::UseLighting => Some("bUseLighting"),
            Uniform::UvScale => Some("UVscale"),
            _ => None,
        }
    }

    const PLAIN: [Uniform; 9] = [
        Uniform::Model,
        Uniform::View,
        Uniform::Projection,
        Uniform::ViewPosition,
        Uniform::ObjectColor,
        Uniform::ObjectTexture,
        Uniform::UseTexture,
        Uniform::UseLighting,
        Uniform::UvScale,
    ];
}

impl fmt::Display for Uniform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uniform::Material(field) => write!(f, "material.{}", field.as_str()),
            Uniform::DirectionalLight(field) => write!(f, "directionalLight.{}", field.as_str()),
            Uniform::PointLight(index, field) => {
                write!(f, "pointLights[{}].{}", index, field.as_str())
            }
            Uniform::SpotLight(field) => write!(f, "spotLight.{}", field.as_str()),
            plain => f.write_str(plain.plain_name().unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shader uniform '{0}'")]
pub struct UnknownUniform(pub String);

impl FromStr for Uniform {
    type Err = UnknownUniform;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let unknown = || UnknownUniform(name.to_string());

        if let Some(plain) = Uniform::PLAIN
            .into_iter()
            .find(|uniform| uniform.plain_name() == Some(name))
        {
            return Ok(plain);
        }

        let (prefix, field) = name.split_once('.').ok_or_else(unknown)?;
        if prefix == "material" {
            return MaterialField::ALL
                .into_iter()
                .find(|candidate| candidate.as_str() == field)
                .map(Uniform::Material)
                .ok_or_else(unknown);
        }

        let field = LightField::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == field)
            .ok_or_else(unknown)?;
        match prefix {
            "directionalLight" => Ok(Uniform::DirectionalLight(field)),
            "spotLight" => Ok(Uniform::SpotLight(field)),
            _ => {
                let index = prefix
                    .strip_prefix("pointLights[")
                    .and_then(|rest| rest.strip_suffix(']'))
                    .and_then(|index| index.parse().ok())
                    .ok_or_else(unknown)?;
                Ok(Uniform::PointLight(index, field))
            }
        }
    }
}

/// Receiver of named uniform writes: a shader program, or anything standing
/// in for one.
pub trait UniformSink {
    fn set_mat4(&mut self, name: Uniform, value: Matrix4<f32>);
    fn set_vec2(&mut self, name: Uniform, value: Vector2<f32>);
    fn set_vec3(&mut self, name: Uniform, value: Vector3<f32>);
    fn set_vec4(&mut self, name: Uniform, value: Vector4<f32>);
    fn set_float(&mut self, name: Uniform, value: f32);
    fn set_int(&mut self, name: Uniform, value: i32);
    fn set_bool(&mut self, name: Uniform, value: bool);

    /// Point a sampler uniform at a texture unit.
    fn set_sampler(&mut self, name: Uniform, unit: i32) {
        self.set_int(name, unit);
    }
}

/// Per-object uniform values in effect at one draw call.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    pub model: Matrix4<f32>,
    /// `None` until a material has been set.
    pub material: Option<Material>,
    pub use_texture: bool,
    pub texture_slot: i32,
    pub object_color: Vector4<f32>,
    pub uv_scale: Vector2<f32>,
}

impl DrawState {
    /// Write these values to `sink`, e.g. to replay a recorded draw.
    pub fn apply<S: UniformSink + ?Sized>(&self, sink: &mut S) {
        sink.set_mat4(Uniform::Model, self.model);
        if let Some(material) = &self.material {
            sink.set_vec3(Uniform::Material(MaterialField::DiffuseColor), material.diffuse_color);
            sink.set_vec3(Uniform::Material(MaterialField::SpecularColor), material.specular_color);
            sink.set_float(Uniform::Material(MaterialField::Shininess), material.shininess);
        }
        sink.set_bool(Uniform::UseTexture, self.use_texture);
        sink.set_sampler(Uniform::ObjectTexture, self.texture_slot);
        sink.set_vec4(Uniform::ObjectColor, self.object_color);
        sink.set_vec2(Uniform::UvScale, self.uv_scale);
    }
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            material: None,
            use_texture: false,
            texture_slot: MISSING_SLOT,
            object_color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            uv_scale: Vector2::new(1.0, 1.0),
        }
    }
}

/// Façade over a [`UniformSink`] that speaks in material and texture tags.
pub struct ShaderState<'a, S: ?Sized, H> {
    sink: &'a mut S,
    textures: &'a TextureRegistry<H>,
    materials: &'a MaterialLibrary,
    current: DrawState,
}

impl<'a, S, H> ShaderState<'a, S, H>
where
    S: UniformSink + ?Sized,
{
    pub fn new(
        sink: &'a mut S,
        textures: &'a TextureRegistry<H>,
        materials: &'a MaterialLibrary,
    ) -> Self {
        Self {
            sink,
            textures,
            materials,
            current: DrawState::default(),
        }
    }

    /// Per-object values written so far.
    pub fn current(&self) -> &DrawState {
        &self.current
    }

    pub fn set_transformations(&mut self, transform: &ModelTransform) {
        self.current.model = transform.to_matrix();
        self.sink.set_mat4(Uniform::Model, self.current.model);
    }

    /// Write the material's colours and shininess. An unknown tag leaves the
    /// current material uniforms untouched.
    pub fn set_material(&mut self, tag: &str) {
        let Some(material) = self.materials.lookup(tag) else {
            log::debug!("No material '{}', keeping the current material", tag);
            return;
        };
        self.sink
            .set_vec3(Uniform::Material(MaterialField::DiffuseColor), material.diffuse_color);
        self.sink
            .set_vec3(Uniform::Material(MaterialField::SpecularColor), material.specular_color);
        self.sink
            .set_float(Uniform::Material(MaterialField::Shininess), material.shininess);
        self.current.material = Some(material);
    }

    /// Switch to texturing from the slot registered for `tag`.
    ///
    /// An unknown tag still enables texturing and writes [`MISSING_SLOT`].
    pub fn set_texture(&mut self, tag: &str) {
        self.sink.set_bool(Uniform::UseTexture, true);
        let slot = match self.textures.lookup_slot(tag) {
            Some(slot) => slot as i32,
            None => {
                log::debug!("No texture '{}', sampling slot {}", tag, MISSING_SLOT);
                MISSING_SLOT
            }
        };
        self.sink.set_sampler(Uniform::ObjectTexture, slot);
        self.current.use_texture = true;
        self.current.texture_slot = slot;
    }

    /// Switch to a flat colour instead of a texture.
    pub fn set_solid_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.current.use_texture = false;
        self.current.object_color = Vector4::new(red, green, blue, alpha);
        self.sink.set_bool(Uniform::UseTexture, false);
        self.sink.set_vec4(Uniform::ObjectColor, self.current.object_color);
    }

    pub fn set_uv_scale(&mut self, u: f32, v: f32) {
        self.current.uv_scale = Vector2::new(u, v);
        self.sink.set_vec2(Uniform::UvScale, self.current.uv_scale);
    }
}
