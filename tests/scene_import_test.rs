use std::path::{Path, PathBuf};

use flow_mesh::{
    Model,
    cgmath::Vector3,
    data_structures::{material::TextureKind, model::DEFAULT_SHININESS},
    resources::load_scene,
};

use crate::common::test_utils::{RecordingBackend, init_logger};

mod common;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn mesh_names(model: &Model<RecordingBackend>) -> Vec<&str> {
    model.meshes().iter().map(|m| m.name()).collect()
}

#[test]
fn should_import_obj_objects_as_children_of_the_root() {
    init_logger();
    let scene = load_scene(&fixture("room.obj")).unwrap();

    assert!(scene.root.meshes.is_empty());
    let children: Vec<_> = scene.root.children.iter().map(|c| (c.name.as_str(), c.meshes.clone())).collect();
    assert_eq!(children, vec![("Floor", vec![0]), ("Wall", vec![1])]);

    let floor = &scene.meshes[0];
    assert_eq!(floor.positions.len(), 4);
    assert_eq!(floor.faces, vec![vec![0, 1, 2], vec![0, 2, 3]]);
    // V is flipped for top-left texture origins
    assert_eq!(floor.tex_coords.as_ref().unwrap()[0], [0.0, 1.0]);
    assert_eq!(floor.material, Some(0));

    let wall = &scene.materials[1];
    assert_eq!(wall.name, "wall");
    assert_eq!(wall.diffuse_textures, vec!["checker.png".to_string()]);
    assert_eq!(wall.specular_textures, vec!["shine.png".to_string()]);
    assert_eq!(wall.specular, Some([0.5, 0.5, 0.5]));
}

#[test]
fn should_load_an_obj_model_with_shared_textures() {
    let backend = RecordingBackend::new();
    let model = Model::load_default(&backend, fixture("room.obj"), fixture("textures")).unwrap();

    assert_eq!(mesh_names(&model), vec!["Floor", "Wall"]);
    assert!(model.meshes().iter().all(|m| m.index_count() == 6));
    assert_eq!(model.shininess(), DEFAULT_SHININESS);
    assert_eq!(model.texture_count(), 2);
    assert_eq!(
        backend.texture_loads(),
        vec![fixture("textures").join("checker.png"), fixture("textures").join("shine.png")]
    );

    let wall = model.meshes()[1].material();
    let kinds: Vec<_> = wall.textures.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TextureKind::Diffuse, TextureKind::Specular]);
}

#[test]
fn should_load_obj_without_materials_or_uvs() {
    let backend = RecordingBackend::new();
    let model = Model::load(&backend, fixture("untextured.obj"), fixture("textures"), 8.0).unwrap();

    assert_eq!(model.meshes().len(), 1);
    let material = model.meshes()[0].material();
    assert!(!material.uses_textures());
    assert_eq!(material.diffuse, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(material.shininess, 8.0);
    assert!(backend.texture_loads().is_empty());
}

#[test]
fn should_flatten_gltf_nodes_in_pre_order() {
    let scene = load_scene(&fixture("hierarchy.gltf")).unwrap();
    assert_eq!(scene.root.name, "Scene");
    // One mesh per primitive: `body` has two, `arm` one
    assert_eq!(scene.meshes.len(), 3);
    assert_eq!(scene.root.children[0].meshes, vec![0, 1]);
    assert_eq!(scene.root.children[0].children[0].meshes, vec![2]);
    assert_eq!(scene.materials[0].diffuse_textures, vec!["checker.png".to_string()]);

    let backend = RecordingBackend::new();
    let model = Model::load_default(&backend, fixture("hierarchy.gltf"), fixture("textures")).unwrap();
    assert_eq!(mesh_names(&model), vec!["body", "body", "arm"]);
    assert_eq!(model.texture_count(), 1);
    assert_eq!(backend.texture_loads().len(), 1);
    assert!(model.meshes()[0].material().uses_textures());
    assert!(!model.meshes()[1].material().uses_textures());
    assert_eq!(model.meshes()[0].material().diffuse, Vector3::new(0.5, 0.5, 0.5));
}

#[test]
fn should_skip_gltf_images_embedded_as_data_uris() {
    let scene = load_scene(&fixture("embedded_texture.gltf")).unwrap();
    assert_eq!(scene.materials[0].name, "embedded");
    assert!(scene.materials[0].diffuse_textures.is_empty());
    assert_eq!(scene.materials[0].diffuse, Some([0.5, 0.5, 0.5]));

    let backend = RecordingBackend::new();
    let model = Model::load_default(&backend, fixture("embedded_texture.gltf"), fixture("textures")).unwrap();
    assert_eq!(mesh_names(&model), vec!["body", "body", "arm"]);
    assert!(backend.texture_loads().is_empty());
    assert_eq!(model.texture_count(), 0);
    // The material keeps its colours and falls back to them
    let material = model.meshes()[0].material();
    assert!(!material.uses_textures());
    assert_eq!(material.diffuse, Vector3::new(0.5, 0.5, 0.5));
}

#[test]
fn should_reject_unknown_formats_and_missing_files() {
    let err = load_scene(Path::new("scene.fbx")).unwrap_err();
    assert!(err.to_string().contains("unsupported scene format"));

    let backend = RecordingBackend::new();
    assert!(Model::load_default(&backend, fixture("missing.obj"), fixture("textures")).is_err());
    assert!(Model::load_default(&backend, fixture("missing.gltf"), fixture("textures")).is_err());
}

#[test]
fn should_fail_the_whole_load_when_a_texture_is_missing() {
    let backend = RecordingBackend {
        missing: vec![fixture("textures").join("shine.png")],
        ..Default::default()
    };
    let result = Model::load_default(&backend, fixture("room.obj"), fixture("textures"));
    assert!(result.is_err());
}
