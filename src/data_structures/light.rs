//! Scene lighting.
//!
//! The still-life is lit by one directional light (sunlight), two point lights
//! and an overhead spot light. Lights are written to the shader once while the
//! scene is prepared; the camera later moves the spot light along with it.

use cgmath::{Deg, Vector3};

use crate::shader::{LightField, Uniform, UniformSink};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
}

/// A point light with constant/linear/quadratic distance attenuation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpotLight {
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    /// Inner cone half-angle.
    pub cut_off: Deg<f32>,
    /// Outer cone half-angle; light fades out between the two.
    pub outer_cut_off: Deg<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneLights {
    pub directional: DirectionalLight,
    pub points: Vec<PointLight>,
    pub spot: SpotLight,
}

impl SceneLights {
    pub fn scene_defaults() -> Self {
        Self {
            directional: DirectionalLight {
                direction: Vector3::new(-0.5, -1.0, -0.3),
                ambient: Vector3::new(0.2, 0.2, 0.2),
                diffuse: Vector3::new(0.7, 0.7, 0.6),
                specular: Vector3::new(0.5, 0.5, 0.5),
            },
            points: vec![
                PointLight {
                    position: Vector3::new(-3.0, 5.0, 2.0),
                    ambient: Vector3::new(0.1, 0.1, 0.1),
                    diffuse: Vector3::new(0.6, 0.6, 0.5),
                    specular: Vector3::new(0.7, 0.7, 0.6),
                    constant: 1.0,
                    linear: 0.09,
                    quadratic: 0.032,
                },
                PointLight {
                    position: Vector3::new(4.0, 5.0, -2.0),
                    ambient: Vector3::new(0.1, 0.1, 0.1),
                    diffuse: Vector3::new(0.5, 0.5, 0.6),
                    specular: Vector3::new(0.6, 0.6, 0.7),
                    constant: 1.0,
                    linear: 0.09,
                    quadratic: 0.032,
                },
            ],
            spot: SpotLight {
                position: Vector3::new(0.0, 6.0, 0.0),
                direction: Vector3::new(0.0, -1.0, 0.0),
                ambient: Vector3::new(0.05, 0.05, 0.05),
                diffuse: Vector3::new(0.7, 0.7, 0.6),
                specular: Vector3::new(0.8, 0.8, 0.7),
                constant: 1.0,
                linear: 0.07,
                quadratic: 0.017,
                cut_off: Deg(15.0),
                outer_cut_off: Deg(25.0),
            },
        }
    }

    /// Enable lighting and write every light to the shader.
    pub fn apply<S: UniformSink + ?Sized>(&self, sink: &mut S) {
        sink.set_bool(Uniform::UseLighting, true);

        let light = &self.directional;
        let field = Uniform::DirectionalLight;
        sink.set_vec3(field(LightField::Direction), light.direction);
        sink.set_vec3(field(LightField::Ambient), light.ambient);
        sink.set_vec3(field(LightField::Diffuse), light.diffuse);
        sink.set_vec3(field(LightField::Specular), light.specular);
        sink.set_bool(field(LightField::Active), true);

        for (index, light) in self.points.iter().enumerate() {
            let field = |field| Uniform::PointLight(index, field);
            sink.set_vec3(field(LightField::Position), light.position);
            sink.set_vec3(field(LightField::Ambient), light.ambient);
            sink.set_vec3(field(LightField::Diffuse), light.diffuse);
            sink.set_vec3(field(LightField::Specular), light.specular);
            sink.set_float(field(LightField::Constant), light.constant);
            sink.set_float(field(LightField::Linear), light.linear);
            sink.set_float(field(LightField::Quadratic), light.quadratic);
            sink.set_bool(field(LightField::Active), true);
        }

        let light = &self.spot;
        let field = Uniform::SpotLight;
        sink.set_vec3(field(LightField::Position), light.position);
        sink.set_vec3(field(LightField::Direction), light.direction);
        sink.set_vec3(field(LightField::Ambient), light.ambient);
        sink.set_vec3(field(LightField::Diffuse), light.diffuse);
        sink.set_vec3(field(LightField::Specular), light.specular);
        sink.set_float(field(LightField::Constant), light.constant);
        sink.set_float(field(LightField::Linear), light.linear);
        sink.set_float(field(LightField::Quadratic), light.quadratic);
        // the shader compares against dot products, so it wants cosines
        sink.set_float(field(LightField::CutOff), cgmath::Angle::cos(light.cut_off));
        sink.set_float(field(LightField::OuterCutOff), cgmath::Angle::cos(light.outer_cut_off));
        sink.set_bool(field(LightField::Active), true);
    }
}

impl Default for SceneLights {
    fn default() -> Self {
        Self::scene_defaults()
    }
}
