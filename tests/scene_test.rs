use cgmath::{Angle, Deg, Vector3};
use still_life::{
    config::SceneConfig,
    data_structures::transform::ModelTransform,
    mesh::{DrawList, Shape, ShapeKind},
    pipelines::uniforms::ShaderUniforms,
    scene::{SCENE_TEXTURES, ScenePhase, SceneManager},
};
use tempfile::TempDir;

use crate::common::test_utils::{
    FakeGpu, RecordingSink, Value, approx_eq, fixture_dir, init_logger, write_scene_textures,
};

mod common;

struct Fixture {
    scene: SceneManager<FakeGpu, DrawList>,
    gpu: FakeGpu,
    sink: RecordingSink,
    _dir: TempDir,
}

fn prepared_scene(test: &str) -> Fixture {
    init_logger();
    let dir = fixture_dir(test);
    write_scene_textures(dir.path());
    let gpu = FakeGpu::new();
    let config = SceneConfig::default().with_texture_dir(dir.path());
    let mut scene = SceneManager::new(&config, gpu.clone(), Some(DrawList::new()));
    let mut sink = RecordingSink::new();
    scene.prepare(&mut sink);
    Fixture {
        scene,
        gpu,
        sink,
        _dir: dir,
    }
}

#[test]
fn prepare_registers_scene_textures_in_order() {
    let Fixture { scene, gpu, _dir, .. } = prepared_scene("prepare");

    assert_eq!(scene.phase(), ScenePhase::Prepared);
    assert_eq!(scene.textures().len(), SCENE_TEXTURES.len());
    assert_eq!(scene.textures().lookup_slot("teapot"), Some(0));
    assert_eq!(scene.textures().lookup_slot("roundtable"), Some(3));
    assert_eq!(scene.textures().lookup_slot("glasshandle"), Some(10));
    assert_eq!(scene.textures().lookup_slot("leaftexture"), Some(12));
    for (slot, (_, tag)) in SCENE_TEXTURES.iter().enumerate() {
        assert_eq!(scene.textures().scan_slot(tag), Some(slot));
    }

    let log = gpu.log.borrow();
    assert_eq!(log.created.len(), 13);
    assert_eq!(log.bound.len(), 13);
    assert!(log.bound.iter().all(|(unit, id)| *unit == *id as usize));
}

#[test]
fn prepare_defines_materials_and_loads_every_mesh() {
    let Fixture { scene, _dir, .. } = prepared_scene("meshes");
    assert_eq!(scene.materials().len(), 12);
    let meshes = scene.meshes().unwrap();
    assert!(ShapeKind::ALL.into_iter().all(|kind| meshes.is_loaded(kind)));
}

#[test]
fn prepare_writes_the_lights() {
    let Fixture { sink, _dir, .. } = prepared_scene("lights");

    assert_eq!(sink.last("bUseLighting"), Some(&Value::Bool(true)));
    assert_eq!(
        sink.last("directionalLight.direction"),
        Some(&Value::Vec3(Vector3::new(-0.5, -1.0, -0.3)))
    );
    assert_eq!(
        sink.last("pointLights[0].position"),
        Some(&Value::Vec3(Vector3::new(-3.0, 5.0, 2.0)))
    );
    assert_eq!(
        sink.last("pointLights[1].position"),
        Some(&Value::Vec3(Vector3::new(4.0, 5.0, -2.0)))
    );
    assert_eq!(sink.last("pointLights[1].linear"), Some(&Value::Float(0.09)));
    assert_eq!(sink.last("spotLight.quadratic"), Some(&Value::Float(0.017)));
    for active in ["directionalLight.bActive", "pointLights[0].bActive", "pointLights[1].bActive", "spotLight.bActive"] {
        assert_eq!(sink.last(active), Some(&Value::Bool(true)));
    }

    let Some(Value::Float(cut_off)) = sink.last("spotLight.cutOff") else {
        panic!("spotLight.cutOff not written");
    };
    let Some(Value::Float(outer)) = sink.last("spotLight.outerCutOff") else {
        panic!("spotLight.outerCutOff not written");
    };
    assert!(approx_eq(*cut_off, Deg(15.0f32).cos()));
    assert!(approx_eq(*outer, Deg(25.0f32).cos()));
}

#[test]
fn second_prepare_is_ignored() {
    let Fixture {
        mut scene,
        gpu,
        mut sink,
        _dir, ..
    } = prepared_scene("twice");
    sink.clear();
    scene.prepare(&mut sink);
    assert!(sink.writes.is_empty());
    assert_eq!(gpu.log.borrow().created.len(), 13);
}

#[test]
fn render_draws_every_object_in_order() {
    let Fixture {
        mut scene, mut sink, _dir, ..
    } = prepared_scene("render");
    sink.clear();
    scene.render(&mut sink);

    let expected = [
        // table, backdrop
        Shape::cylinder(),
        Shape::Plane,
        // percolator
        Shape::tapered_cylinder(),
        Shape::tapered_cylinder(),
        Shape::Torus,
        Shape::cylinder(),
        Shape::cylinder(),
        // coffee cup
        Shape::cylinder(),
        Shape::Torus,
        Shape::cylinder(),
        // books
        Shape::Box,
        Shape::Box,
        Shape::Box,
        Shape::Box,
        Shape::Box,
        Shape::Box,
        // tray
        Shape::Box,
        Shape::Box,
        Shape::Box,
        Shape::Box,
        Shape::Box,
        // flower pot
        Shape::cylinder(),
        Shape::cylinder(),
        Shape::Sphere,
    ];
    assert_eq!(scene.meshes().unwrap().shapes(), expected);
    assert_eq!(sink.count("model"), 24);
    // the knob and the four tray edges reuse the previous texture
    assert_eq!(sink.count("objectTexture"), 19);
    // the tray edges also reuse the previous material
    assert_eq!(sink.count("material.shininess"), 20);
}

#[test]
fn every_part_sets_its_transform_before_drawing() {
    let Fixture {
        mut scene, mut sink, _dir, ..
    } = prepared_scene("protocol");
    sink.clear();
    scene.render(&mut sink);

    let names = sink.names();
    assert_eq!(names.first(), Some(&"model"));
    // the table samples the round table texture from slot 3
    let table_texture = names.iter().position(|name| *name == "objectTexture").unwrap();
    assert_eq!(sink.writes[table_texture].1, Value::Int(3));
    // the last drawn part, the plant, samples the leaf texture
    assert_eq!(sink.last("objectTexture"), Some(&Value::Int(12)));
    assert_eq!(sink.last("material.shininess"), Some(&Value::Float(6.0)));
}

#[test]
fn render_before_prepare_draws_nothing() {
    init_logger();
    let mut scene = SceneManager::new(&SceneConfig::default(), FakeGpu::new(), Some(DrawList::new()));
    let mut sink = RecordingSink::new();
    scene.render(&mut sink);
    assert!(sink.writes.is_empty());
    assert!(scene.meshes().unwrap().draws().is_empty());
}

#[test]
fn scene_without_meshes_renders_nothing() {
    init_logger();
    let dir = fixture_dir("no-meshes");
    write_scene_textures(dir.path());
    let config = SceneConfig::default().with_texture_dir(dir.path());
    let mut scene: SceneManager<FakeGpu, DrawList> = SceneManager::new(&config, FakeGpu::new(), None);
    let mut sink = RecordingSink::new();

    scene.prepare(&mut sink);
    assert_eq!(scene.phase(), ScenePhase::Prepared);
    sink.clear();
    scene.render(&mut sink);
    assert!(sink.writes.is_empty());
}

#[test]
fn missing_texture_files_fall_back_to_missing_slot() {
    init_logger();
    let dir = fixture_dir("empty");
    let config = SceneConfig::default().with_texture_dir(dir.path());
    let mut scene = SceneManager::new(&config, FakeGpu::new(), Some(DrawList::new()));
    let mut sink = RecordingSink::new();

    scene.prepare(&mut sink);
    assert!(scene.textures().is_empty());
    sink.clear();
    scene.render(&mut sink);

    assert_eq!(scene.meshes().unwrap().draws().len(), 24);
    assert!(
        sink.writes
            .iter()
            .filter(|(name, _)| name == "objectTexture")
            .all(|(_, value)| *value == Value::Int(-1))
    );
}

#[test]
fn textures_are_released_exactly_once() {
    let Fixture { mut scene, gpu, _dir, .. } = prepared_scene("release");
    assert_eq!(scene.release_textures(), 13);
    assert_eq!(scene.release_textures(), 0);
    drop(scene);

    let log = gpu.log.borrow();
    assert_eq!(log.destroyed.len(), 13);
    assert_eq!(log.live(), 0);
}

#[test]
fn dropping_the_scene_releases_its_textures() {
    let Fixture { scene, gpu, _dir, .. } = prepared_scene("drop");
    drop(scene);
    assert_eq!(gpu.log.borrow().destroyed.len(), 13);
}

#[test]
fn each_draw_carries_its_own_object_uniforms() {
    let Fixture {
        mut scene, mut sink, _dir, ..
    } = prepared_scene("per-draw");
    scene.render(&mut sink);

    let draws = scene.meshes().unwrap().draws();
    let table = &draws[0].state;
    let plant = &draws[23].state;
    assert_eq!(
        table.model,
        ModelTransform::placed([15.0, 0.0, 15.0], [0.0, 0.0, 0.0]).to_matrix()
    );
    assert_eq!(
        plant.model,
        ModelTransform::placed([0.5, 0.5, 0.5], [-7.0, 0.8, 0.0]).to_matrix()
    );
    assert_ne!(table.model, plant.model);
    assert_eq!((table.texture_slot, plant.texture_slot), (3, 12));
    assert_eq!(table.material.as_ref().unwrap().tag, "plate");
    assert_eq!(plant.material.as_ref().unwrap().tag, "leaf");

    // the knob keeps the lid's texture and the tray edges keep the base's material
    assert_eq!(draws[6].state.texture_slot, draws[5].state.texture_slot);
    assert_eq!(draws[6].state.material.as_ref().unwrap().tag, "wood");
    assert_eq!(draws[17].state.material, draws[16].state.material);
}

#[test]
fn recorded_draws_replay_into_the_object_block() {
    let Fixture {
        mut scene, mut sink, _dir, ..
    } = prepared_scene("replay");
    scene.render(&mut sink);
    let draws = scene.meshes().unwrap().draws();

    let mut uniforms = ShaderUniforms::new();
    draws[0].state.apply(&mut uniforms);
    let table = *uniforms.object();
    draws[23].state.apply(&mut uniforms);
    let plant = *uniforms.object();

    let table_model: [[f32; 4]; 4] = draws[0].state.model.into();
    assert_eq!(table.model, table_model);
    assert_eq!(table.texture_slot, 3);
    assert_eq!(plant.texture_slot, 12);
    assert_eq!(plant.shininess, 6.0);
    assert_ne!(table.model, plant.model);
}

#[test]
fn draws_are_recorded_per_frame() {
    let Fixture {
        mut scene, mut sink, _dir, ..
    } = prepared_scene("per-frame");
    for _ in 0..5 {
        scene.render(&mut sink);
    }
    assert_eq!(scene.meshes().unwrap().draws().len(), 24);
}
