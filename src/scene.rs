//! The still-life scene.
//!
//! [`SceneManager`] owns everything the scene needs between frames: the
//! texture registry and the backend its handles belong to, the material
//! library, the lights and the mesh collaborator. It goes through two phases:
//!
//! 1. `prepare` (once) registers textures, defines materials, writes the
//!    lights and loads the shape meshes.
//! 2. `render` (every frame) places and draws each object of the scene in a
//!    fixed order: table, backdrop, percolator, coffee cup, books, tray and
//!    flower pot.
//!
//! Every drawn part follows the same protocol: set the model transform, then
//! optionally the material, texture and UV scale, then issue one draw call.

use std::path::{Path, PathBuf};

use crate::{
    config::SceneConfig,
    data_structures::{light::SceneLights, material::MaterialLibrary, transform::ModelTransform},
    mesh::{Shape, ShapeKind, ShapeMeshes},
    resources::registry::{RegistryError, TextureBackend, TextureRegistry},
    shader::{ShaderState, UniformSink},
};

/// Texture files and the tags they are registered under, in slot order.
pub const SCENE_TEXTURES: [(&str, &str); 13] = [
    ("ceramic.png", "teapot"),
    ("woodtable.png", "table"),
    ("backdrop.png", "background"),
    ("woodroundtable.jpg", "roundtable"),
    ("coffeecup.png", "cup"),
    ("book.jpg", "book"),
    ("Coffeeliquid.png", "coffee"),
    ("metal.png", "handle"),
    ("pages.png", "pages"),
    ("bookspine.png", "spine"),
    ("glass.png", "glasshandle"),
    ("soiltexture.png", "soiltexture"),
    ("leaftexture.JPG", "leaftexture"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenePhase {
    Empty,
    Prepared,
}

pub struct SceneManager<B: TextureBackend, M> {
    backend: B,
    textures: TextureRegistry<B::Handle>,
    materials: MaterialLibrary,
    lights: SceneLights,
    meshes: Option<M>,
    texture_dir: PathBuf,
    phase: ScenePhase,
}

impl<B, M> SceneManager<B, M>
where
    B: TextureBackend,
    M: ShapeMeshes,
{
    /// A scene with nothing loaded yet. Without `meshes` the scene can be
    /// prepared but renders nothing.
    pub fn new(config: &SceneConfig, backend: B, meshes: Option<M>) -> Self {
        Self {
            backend,
            textures: TextureRegistry::with_capacity(config.texture_capacity),
            materials: MaterialLibrary::default(),
            lights: SceneLights::scene_defaults(),
            meshes,
            texture_dir: config.texture_dir.clone(),
            phase: ScenePhase::Empty,
        }
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    pub fn textures(&self) -> &TextureRegistry<B::Handle> {
        &self.textures
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn lights(&self) -> &SceneLights {
        &self.lights
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn meshes(&self) -> Option<&M> {
        self.meshes.as_ref()
    }

    pub fn meshes_mut(&mut self) -> Option<&mut M> {
        self.meshes.as_mut()
    }

    /// Load one texture file and register it under `tag`.
    ///
    /// Failures are logged and returned; the scene carries on without the
    /// texture.
    pub fn create_texture(&mut self, path: impl AsRef<Path>, tag: &str) -> Result<usize, RegistryError> {
        let result = self.textures.register(&mut self.backend, path, tag);
        if let Err(e) = &result {
            log::error!("Texture '{}' was not registered: {}", tag, e);
        }
        result
    }

    /// Bind all registered textures to their texture units.
    pub fn bind_textures(&mut self) {
        self.textures.bind_all(&mut self.backend);
    }

    /// Register every scene texture from the texture directory and bind them.
    /// Returns how many were registered.
    pub fn load_scene_textures(&mut self) -> usize {
        let dir = self.texture_dir.clone();
        let registered = SCENE_TEXTURES
            .iter()
            .filter(|(file, tag)| self.create_texture(dir.join(file), tag).is_ok())
            .count();
        self.bind_textures();
        log::info!(
            "Registered {} of {} scene textures",
            registered,
            SCENE_TEXTURES.len()
        );
        registered
    }

    pub fn define_object_materials(&mut self) {
        self.materials = MaterialLibrary::scene_defaults();
    }

    pub fn setup_scene_lights<S: UniformSink + ?Sized>(&self, sink: &mut S) {
        self.lights.apply(sink);
    }

    /// Load textures, materials, lights and meshes. Runs only once.
    pub fn prepare<S: UniformSink + ?Sized>(&mut self, sink: &mut S) {
        if self.phase == ScenePhase::Prepared {
            log::warn!("Scene is already prepared");
            return;
        }
        self.load_scene_textures();
        self.define_object_materials();
        self.setup_scene_lights(sink);

        match self.meshes.as_mut() {
            Some(meshes) => ShapeKind::ALL.into_iter().for_each(|kind| meshes.load(kind)),
            None => log::error!("No shape meshes available, the scene will not be drawn"),
        }
        self.phase = ScenePhase::Prepared;
    }

    /// Draw every object of the scene.
    pub fn render<S: UniformSink + ?Sized>(&mut self, sink: &mut S) {
        if self.phase != ScenePhase::Prepared {
            log::debug!("Scene is not prepared yet, skipping render");
            return;
        }
        let Some(meshes) = self.meshes.as_mut() else {
            log::error!("No shape meshes available in render");
            return;
        };

        meshes.begin_frame();
        let mut painter = Painter {
            shader: ShaderState::new(sink, &self.textures, &self.materials),
            meshes,
        };
        painter.table();
        painter.backdrop();
        painter.percolator();
        painter.coffee_cup();
        painter.books();
        painter.tray();
        painter.flower_pot();
    }

    /// Free all GPU textures. Safe to call more than once.
    pub fn release_textures(&mut self) -> usize {
        release(&mut self.textures, &mut self.backend)
    }
}

fn release<B: TextureBackend>(textures: &mut TextureRegistry<B::Handle>, backend: &mut B) -> usize {
    let freed = textures.release(backend);
    if freed > 0 {
        log::info!("Released {} textures", freed);
    }
    freed
}

impl<B: TextureBackend, M> Drop for SceneManager<B, M> {
    fn drop(&mut self) {
        release(&mut self.textures, &mut self.backend);
    }
}

/// One drawn part of an object.
struct Part<'t> {
    transform: ModelTransform,
    material: Option<&'t str>,
    texture: Option<&'t str>,
    uv_scale: Option<(f32, f32)>,
    shape: Shape,
}

impl<'t> Part<'t> {
    fn new(transform: ModelTransform, shape: Shape) -> Self {
        Self {
            transform,
            material: None,
            texture: None,
            uv_scale: None,
            shape,
        }
    }

    fn material(mut self, tag: &'t str) -> Self {
        self.material = Some(tag);
        self
    }

    fn texture(mut self, tag: &'t str) -> Self {
        self.texture = Some(tag);
        self
    }

    fn uv_scale(mut self, u: f32, v: f32) -> Self {
        self.uv_scale = Some((u, v));
        self
    }
}

struct Painter<'a, S: ?Sized, H, M> {
    shader: ShaderState<'a, S, H>,
    meshes: &'a mut M,
}

impl<S, H, M> Painter<'_, S, H, M>
where
    S: UniformSink + ?Sized,
    M: ShapeMeshes,
{
    fn paint(&mut self, part: Part) {
        self.shader.set_transformations(&part.transform);
        if let Some(tag) = part.material {
            self.shader.set_material(tag);
        }
        if let Some(tag) = part.texture {
            self.shader.set_texture(tag);
        }
        if let Some((u, v)) = part.uv_scale {
            self.shader.set_uv_scale(u, v);
        }
        self.meshes.draw(part.shape, self.shader.current());
    }

    fn table(&mut self) {
        self.paint(
            Part::new(ModelTransform::placed([15.0, 0.0, 15.0], [0.0, 0.0, 0.0]), Shape::cylinder())
                .material("plate")
                .texture("roundtable")
                .uv_scale(1.0, 1.0),
        );
    }

    fn backdrop(&mut self) {
        self.paint(
            Part::new(
                ModelTransform::placed([20.0, 1.0, 20.0], [0.0, 20.0, -10.0]).rotated(90.0, 0.0, 0.0),
                Shape::Plane,
            )
            .material("backdrop")
            .texture("background")
            .uv_scale(1.0, 1.0),
        );
    }

    fn percolator(&mut self) {
        let left = -2.5;

        // body
        self.paint(
            Part::new(ModelTransform::placed([1.2, 3.0, 1.2], [left, 0.0, 0.0]), Shape::tapered_cylinder())
                .material("glass")
                .texture("teapot")
                .uv_scale(1.0, 1.0),
        );
        // spout
        self.paint(
            Part::new(
                ModelTransform::placed([0.4, 1.9, 0.4], [left + 0.9, 0.4, 0.0]).rotated(30.0, 90.0, 0.0),
                Shape::tapered_cylinder(),
            )
            .material("glass")
            .texture("teapot"),
        );
        // handle
        self.paint(
            Part::new(
                ModelTransform::placed([0.6, 0.8, 0.2], [left - 0.9, 1.8, 0.0]).rotated(0.0, 0.0, 90.0),
                Shape::Torus,
            )
            .material("glass")
            .texture("teapot"),
        );
        // lid
        self.paint(
            Part::new(ModelTransform::placed([0.6, 0.1, 0.8], [left, 3.0, 0.0]), Shape::cylinder())
                .material("glass")
                .texture("teapot"),
        );
        // knob, still sampling the lid texture
        self.paint(
            Part::new(ModelTransform::placed([0.2, 0.1, 0.2], [left, 3.1, 0.0]), Shape::cylinder())
                .material("wood"),
        );
    }

    fn coffee_cup(&mut self) {
        self.paint(
            Part::new(ModelTransform::placed([1.1, 1.0, 1.2], [0.5, 0.0, 1.0]), Shape::cylinder())
                .material("glass")
                .texture("cup")
                .uv_scale(1.0, 1.0),
        );
        self.paint(
            Part::new(
                ModelTransform::placed([0.5, 0.3, 0.2], [1.5, 0.5, 1.0]).rotated(0.0, 0.0, 1.0),
                Shape::Torus,
            )
            .material("glass")
            .texture("glasshandle"),
        );
        // coffee surface
        self.paint(
            Part::new(ModelTransform::placed([1.1, 0.01, 1.2], [0.5, 1.0, 1.0]), Shape::cylinder())
                .material("liquid")
                .texture("coffee")
                .uv_scale(1.0, 1.0),
        );
    }

    fn book_section(&mut self, scale: [f32; 3], position: [f32; 3], material: &str, texture: &str) {
        self.paint(
            Part::new(ModelTransform::placed(scale, position), Shape::Box)
                .material(material)
                .texture(texture)
                .uv_scale(1.0, 1.0),
        );
    }

    /// Three books stacked diagonally, each a cover box with a slightly
    /// recessed block of pages inside it.
    fn books(&mut self) {
        let gap = 0.02;
        let table_height = 0.2;
        let offset = 0.5;
        let cover = [3.5, 0.3, 2.5];
        let pages = [3.53, 0.23, 2.3];
        let x = -6.0 + offset;

        let stack = [
            (table_height, table_height + 0.01),
            (table_height + 0.3 + gap, table_height + 0.33 + gap),
            (table_height + 0.6 + 2.0 * gap, table_height + 0.61 + 2.0 * gap),
        ];
        for (cover_y, pages_y) in stack {
            self.book_section(cover, [x, cover_y, 5.0 + offset], "cover", "book");
            self.book_section(pages, [x, pages_y, 4.89 + offset], "pages", "pages");
        }
    }

    fn tray(&mut self) {
        self.paint(
            Part::new(ModelTransform::placed([8.0, 0.05, 5.0], [0.0, 0.05, 0.0]), Shape::Box)
                .material("wood")
                .texture("table")
                .uv_scale(1.0, 1.0),
        );

        let height = 0.3;
        let thickness = 0.1;
        let y = height / 2.0 + 0.05;
        let edges = [
            // front, back
            ([8.1, height, thickness], [0.0, y, -2.55]),
            ([8.1, height, thickness], [0.0, y, 2.55]),
            // left, right
            ([thickness, height, 5.1], [-4.05, y, 0.0]),
            ([thickness, height, 5.1], [4.05, y, 0.0]),
        ];
        for (scale, position) in edges {
            self.paint(Part::new(ModelTransform::placed(scale, position), Shape::Box));
        }
    }

    fn flower_pot(&mut self) {
        self.paint(
            Part::new(ModelTransform::placed([0.8, 0.6, 0.8], [-7.0, 0.0, 0.0]), Shape::cylinder())
                .material("glass")
                .texture("teapot")
                .uv_scale(1.0, 1.0),
        );
        self.paint(
            Part::new(ModelTransform::placed([0.7, 0.05, 0.7], [-7.0, 0.56, 0.0]), Shape::cylinder())
                .material("soil")
                .texture("soiltexture")
                .uv_scale(1.0, 1.0),
        );
        // plant
        self.paint(
            Part::new(ModelTransform::placed([0.5, 0.5, 0.5], [-7.0, 0.8, 0.0]), Shape::Sphere)
                .material("leaf")
                .texture("leaftexture")
                .uv_scale(1.0, 1.0),
        );
    }
}
