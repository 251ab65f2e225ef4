#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::HashSet,
    path::Path,
    rc::Rc,
};

use cgmath::{Matrix4, Vector2, Vector3, Vector4};
use tempfile::TempDir;
use still_life::{
    resources::{LoadedImage, TextureBackend},
    scene::SCENE_TEXTURES,
    shader::{Uniform, UniformSink},
};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Texture handle of the [`FakeGpu`]. Deliberately not `Clone`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FakeTexture {
    pub(crate) id: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) channels: u8,
}

#[derive(Debug, Default)]
pub(crate) struct GpuLog {
    pub(crate) created: Vec<(u32, String)>,
    pub(crate) bound: Vec<(usize, u32)>,
    pub(crate) destroyed: Vec<u32>,
}

impl GpuLog {
    pub(crate) fn live(&self) -> usize {
        self.created.len() - self.destroyed.len()
    }
}

/// Texture backend that only records what it is asked to do. The log is
/// shared so tests can inspect it after handing the backend to a scene.
#[derive(Debug, Default, Clone)]
pub(crate) struct FakeGpu {
    pub(crate) log: Rc<RefCell<GpuLog>>,
    next_id: u32,
}

impl FakeGpu {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

impl TextureBackend for FakeGpu {
    type Handle = FakeTexture;

    fn create(&mut self, image: &LoadedImage, label: &str) -> FakeTexture {
        let id = self.next_id;
        self.next_id += 1;
        self.log.borrow_mut().created.push((id, label.to_string()));
        FakeTexture {
            id,
            width: image.width(),
            height: image.height(),
            channels: image.channels(),
        }
    }

    fn bind(&mut self, unit: usize, handle: &FakeTexture) {
        self.log.borrow_mut().bound.push((unit, handle.id));
    }

    fn destroy(&mut self, handle: FakeTexture) {
        let mut log = self.log.borrow_mut();
        assert!(
            !log.destroyed.contains(&handle.id),
            "texture {} destroyed twice",
            handle.id
        );
        log.destroyed.push(handle.id);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Value {
    Mat4(Matrix4<f32>),
    Vec2(Vector2<f32>),
    Vec3(Vector3<f32>),
    Vec4(Vector4<f32>),
    Float(f32),
    Int(i32),
    Bool(bool),
}

/// Uniform sink that keeps every write in order, keyed by the GLSL name.
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingSink {
    pub(crate) writes: Vec<(String, Value)>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn names(&self) -> Vec<&str> {
        self.writes.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub(crate) fn last(&self, name: &str) -> Option<&Value> {
        self.writes
            .iter()
            .rev()
            .find(|(written, _)| written == name)
            .map(|(_, value)| value)
    }

    pub(crate) fn count(&self, name: &str) -> usize {
        self.writes.iter().filter(|(written, _)| written == name).count()
    }

    pub(crate) fn clear(&mut self) {
        self.writes.clear();
    }

    fn push(&mut self, name: Uniform, value: Value) {
        self.writes.push((name.to_string(), value));
    }
}

impl UniformSink for RecordingSink {
    fn set_mat4(&mut self, name: Uniform, value: Matrix4<f32>) {
        self.push(name, Value::Mat4(value));
    }

    fn set_vec2(&mut self, name: Uniform, value: Vector2<f32>) {
        self.push(name, Value::Vec2(value));
    }

    fn set_vec3(&mut self, name: Uniform, value: Vector3<f32>) {
        self.push(name, Value::Vec3(value));
    }

    fn set_vec4(&mut self, name: Uniform, value: Vector4<f32>) {
        self.push(name, Value::Vec4(value));
    }

    fn set_float(&mut self, name: Uniform, value: f32) {
        self.push(name, Value::Float(value));
    }

    fn set_int(&mut self, name: Uniform, value: i32) {
        self.push(name, Value::Int(value));
    }

    fn set_bool(&mut self, name: Uniform, value: bool) {
        self.push(name, Value::Bool(value));
    }
}

/// Fresh, empty directory for one test's fixture files. Removed when the
/// returned guard is dropped, so keep it alive for the whole test.
pub(crate) fn fixture_dir(test: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("still-life-{}-", test))
        .tempdir()
        .expect("create fixture dir")
}

/// Write a `width` x `height` RGBA PNG whose top row is red and every other
/// row is blue.
pub(crate) fn write_rgba(path: &Path, width: u32, height: u32) {
    let image = image::RgbaImage::from_fn(width, height, |_, y| {
        if y == 0 {
            image::Rgba([255, 0, 0, 255])
        } else {
            image::Rgba([0, 0, 255, 255])
        }
    });
    image
        .save_with_format(path, image::ImageFormat::Png)
        .expect("write rgba fixture");
}

pub(crate) fn write_rgb(path: &Path, width: u32, height: u32) {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([10, 200, 30]));
    image
        .save_with_format(path, image::ImageFormat::Png)
        .expect("write rgb fixture");
}

pub(crate) fn write_gray(path: &Path, width: u32, height: u32) {
    let image = image::GrayImage::from_pixel(width, height, image::Luma([128]));
    image
        .save_with_format(path, image::ImageFormat::Png)
        .expect("write gray fixture");
}

/// Write every scene texture file into `dir`. The content is PNG regardless
/// of the file extension.
pub(crate) fn write_scene_textures(dir: &Path) {
    for (file, _) in SCENE_TEXTURES {
        write_rgba(&dir.join(file), 4, 4);
    }
}

pub(crate) fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= 1e-4 * (1.0 + a.abs().max(b.abs()))
}

pub(crate) fn assert_vec3_eq(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        approx_eq(actual.x, expected.x) && approx_eq(actual.y, expected.y) && approx_eq(actual.z, expected.z),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

pub(crate) fn assert_mat4_eq(actual: Matrix4<f32>, expected: Matrix4<f32>) {
    let a: &[f32; 16] = actual.as_ref();
    let b: &[f32; 16] = expected.as_ref();
    assert!(
        a.iter().zip(b.iter()).all(|(x, y)| approx_eq(*x, *y)),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

pub(crate) fn unique<T: std::hash::Hash + Eq>(items: impl IntoIterator<Item = T>) -> usize {
    items.into_iter().collect::<HashSet<_>>().len()
}
