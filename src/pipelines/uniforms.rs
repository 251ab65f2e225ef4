use cgmath::{Matrix4, SquareMatrix, Vector2, Vector3, Vector4};
use wgpu::util::DeviceExt;

use crate::shader::{LightField, MaterialField, Uniform, UniformSink};

/// Number of point lights the frame uniform block has room for.
pub const MAX_POINT_LIGHTS: usize = 4;

/// OpenGL clip space has z in [-1, 1], WGPU in [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

// Every vec3 is stored as a vec4 so that the blocks follow the 16 byte
// alignment rules of uniform buffers without hidden padding.

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub active: u32,
    _padding: [u32; 3],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub active: u32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpotLightRaw {
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub cut_off: f32,
    pub outer_cut_off: f32,
    pub active: u32,
    _padding: [u32; 2],
}

/// Uniforms that stay fixed for a whole frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub view_position: [f32; 4],
    pub use_lighting: u32,
    _padding: [u32; 3],
    pub directional_light: DirectionalLightRaw,
    pub point_lights: [PointLightRaw; MAX_POINT_LIGHTS],
    pub spot_light: SpotLightRaw,
}

/// Uniforms that change with every drawn object.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub diffuse_color: [f32; 4],
    pub specular_color: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub texture_slot: i32,
    pub shininess: f32,
    _padding: [f32; 3],
}

fn identity() -> [[f32; 4]; 4] {
    Matrix4::<f32>::identity().into()
}

fn extend(value: Vector3<f32>) -> [f32; 4] {
    value.extend(0.0).into()
}

impl Default for FrameUniform {
    fn default() -> Self {
        Self {
            view: identity(),
            projection: identity(),
            ..bytemuck::Zeroable::zeroed()
        }
    }
}

impl Default for ObjectUniform {
    fn default() -> Self {
        Self {
            model: identity(),
            object_color: [1.0; 4],
            uv_scale: [1.0, 1.0],
            ..bytemuck::Zeroable::zeroed()
        }
    }
}

/// CPU-side uniform store for the WGPU renderer.
///
/// Implements [`UniformSink`] by packing each named write into the
/// [`FrameUniform`] or [`ObjectUniform`] block that a shader would read it
/// from. Writes to uniforms of the wrong type are dropped with a warning.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ShaderUniforms {
    frame: FrameUniform,
    object: ObjectUniform,
}

impl ShaderUniforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &FrameUniform {
        &self.frame
    }

    pub fn object(&self) -> &ObjectUniform {
        &self.object
    }

    fn point_light(&mut self, index: usize) -> Option<&mut PointLightRaw> {
        let light = self.frame.point_lights.get_mut(index);
        if light.is_none() {
            log::warn!("Point light {} exceeds the {} supported lights", index, MAX_POINT_LIGHTS);
        }
        light
    }

    fn light_vec3(&mut self, name: Uniform) -> Option<&mut [f32; 4]> {
        match name {
            Uniform::ViewPosition => Some(&mut self.frame.view_position),
            Uniform::Material(MaterialField::DiffuseColor) => Some(&mut self.object.diffuse_color),
            Uniform::Material(MaterialField::SpecularColor) => Some(&mut self.object.specular_color),
            Uniform::DirectionalLight(field) => {
                let light = &mut self.frame.directional_light;
                match field {
                    LightField::Direction => Some(&mut light.direction),
                    LightField::Ambient => Some(&mut light.ambient),
                    LightField::Diffuse => Some(&mut light.diffuse),
                    LightField::Specular => Some(&mut light.specular),
                    _ => None,
                }
            }
            Uniform::PointLight(index, field) => {
                let light = self.point_light(index)?;
                match field {
                    LightField::Position => Some(&mut light.position),
                    LightField::Ambient => Some(&mut light.ambient),
                    LightField::Diffuse => Some(&mut light.diffuse),
                    LightField::Specular => Some(&mut light.specular),
                    _ => None,
                }
            }
            Uniform::SpotLight(field) => {
                let light = &mut self.frame.spot_light;
                match field {
                    LightField::Position => Some(&mut light.position),
                    LightField::Direction => Some(&mut light.direction),
                    LightField::Ambient => Some(&mut light.ambient),
                    LightField::Diffuse => Some(&mut light.diffuse),
                    LightField::Specular => Some(&mut light.specular),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn float(&mut self, name: Uniform) -> Option<&mut f32> {
        match name {
            Uniform::Material(MaterialField::Shininess) => Some(&mut self.object.shininess),
            Uniform::PointLight(index, field) => {
                let light = self.point_light(index)?;
                match field {
                    LightField::Constant => Some(&mut light.constant),
                    LightField::Linear => Some(&mut light.linear),
                    LightField::Quadratic => Some(&mut light.quadratic),
                    _ => None,
                }
            }
            Uniform::SpotLight(field) => {
                let light = &mut self.frame.spot_light;
                match field {
                    LightField::Constant => Some(&mut light.constant),
                    LightField::Linear => Some(&mut light.linear),
                    LightField::Quadratic => Some(&mut light.quadratic),
                    LightField::CutOff => Some(&mut light.cut_off),
                    LightField::OuterCutOff => Some(&mut light.outer_cut_off),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn flag(&mut self, name: Uniform) -> Option<&mut u32> {
        match name {
            Uniform::UseTexture => Some(&mut self.object.use_texture),
            Uniform::UseLighting => Some(&mut self.frame.use_lighting),
            Uniform::DirectionalLight(LightField::Active) => Some(&mut self.frame.directional_light.active),
            Uniform::PointLight(index, LightField::Active) => {
                self.point_light(index).map(|light| &mut light.active)
            }
            Uniform::SpotLight(LightField::Active) => Some(&mut self.frame.spot_light.active),
            _ => None,
        }
    }
}

fn mismatch(name: Uniform, kind: &str) {
    log::warn!("Uniform '{}' does not take a {}", name, kind);
}

impl UniformSink for ShaderUniforms {
    fn set_mat4(&mut self, name: Uniform, value: Matrix4<f32>) {
        match name {
            Uniform::Model => self.object.model = value.into(),
            Uniform::View => self.frame.view = value.into(),
            Uniform::Projection => self.frame.projection = (OPENGL_TO_WGPU_MATRIX * value).into(),
            _ => mismatch(name, "mat4"),
        }
    }

    fn set_vec2(&mut self, name: Uniform, value: Vector2<f32>) {
        match name {
            Uniform::UvScale => self.object.uv_scale = value.into(),
            _ => mismatch(name, "vec2"),
        }
    }

    fn set_vec3(&mut self, name: Uniform, value: Vector3<f32>) {
        match self.light_vec3(name) {
            Some(slot) => *slot = extend(value),
            None => mismatch(name, "vec3"),
        }
    }

    fn set_vec4(&mut self, name: Uniform, value: Vector4<f32>) {
        match name {
            Uniform::ObjectColor => self.object.object_color = value.into(),
            _ => mismatch(name, "vec4"),
        }
    }

    fn set_float(&mut self, name: Uniform, value: f32) {
        match self.float(name) {
            Some(slot) => *slot = value,
            None => mismatch(name, "float"),
        }
    }

    fn set_int(&mut self, name: Uniform, value: i32) {
        match name {
            Uniform::ObjectTexture => self.object.texture_slot = value,
            _ => match self.flag(name) {
                Some(slot) => *slot = (value != 0) as u32,
                None => mismatch(name, "int"),
            },
        }
    }

    fn set_bool(&mut self, name: Uniform, value: bool) {
        match self.flag(name) {
            Some(slot) => *slot = value as u32,
            None => mismatch(name, "bool"),
        }
    }
}

pub fn mk_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, uniform: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(uniform),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// Binding 0 is the frame block, binding 1 the object block.
pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let entry = |binding| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[entry(0), entry(1)],
        label: Some("scene_uniform_bind_group_layout"),
    })
}

/// GPU copies of the two uniform blocks.
#[derive(Debug)]
pub struct UniformBuffers {
    pub frame: wgpu::Buffer,
    pub object: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl UniformBuffers {
    pub fn new(device: &wgpu::Device, uniforms: &ShaderUniforms) -> Self {
        let frame = mk_buffer(device, "Frame Uniform Buffer", uniforms.frame());
        let object = mk_buffer(device, "Object Uniform Buffer", uniforms.object());
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: frame.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: object.as_entire_binding(),
                },
            ],
            label: Some("scene_uniform_bind_group"),
        });
        Self {
            frame,
            object,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&self, queue: &wgpu::Queue, uniforms: &ShaderUniforms) {
        queue.write_buffer(&self.frame, 0, bytemuck::bytes_of(uniforms.frame()));
        queue.write_buffer(&self.object, 0, bytemuck::bytes_of(uniforms.object()));
    }
}
