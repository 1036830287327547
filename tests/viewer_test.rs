use model_viewer::{
    Vector3,
    config::OverrideConfig,
    editor::{self, Target},
    resources::{ImportFlags, display_name, import_model},
    viewer::{StatusLine, Viewer},
};

use crate::common::test_utils::{
    NESTED_GLTF, TWO_OBJECTS_OBJ, textured_gltf, write_file, write_png,
};

mod common;

const SINGLE_OBJECT_OBJ: &str = "\
o only
v 0 0 0
v 1 0 0
v 0 1 0
f 1 2 3
";

const SKINNED_OBJ: &str = "\
mtllib skin.mtl
o only
usemtl skin
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vt 1 0
vt 0 1
f 1/1 2/2 3/3
";

#[test]
fn should_import_obj_objects_as_parts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);

    let imported = import_model(&path, ImportFlags::default()).unwrap();
    let scene = &imported.scene;

    assert_eq!(scene.name(), "two.obj");
    assert_eq!(scene.parts().len(), 2);
    assert_eq!(scene.parts()[0].name(), "first");
    assert_eq!(scene.parts()[1].name(), "second");
    assert_eq!(scene.parts()[0].meshes()[0].face_count(), 2);
    assert_eq!(scene.parts()[0].meshes()[0].vertex_count(), 4);
    assert_eq!(scene.parts()[1].meshes()[0].face_count(), 1);
    assert_eq!(scene.face_count(), 3);
    assert!(imported.textures.is_empty());
}

#[test]
fn should_unweld_for_flat_normals() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);
    let mut flags = ImportFlags::default();
    flags.toggle_step(ImportFlags::GENERATE_NORMALS);

    let imported = import_model(&path, flags).unwrap();
    let mesh = &imported.scene.parts()[0].meshes()[0];

    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.face_count(), 2);
    assert!(mesh.vertices().iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
}

#[test]
fn should_flip_winding_when_asked() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);

    let imported = import_model(&path, ImportFlags::default() | ImportFlags::FLIP_WINDING_ORDER)
        .unwrap();

    assert_eq!(&imported.scene.parts()[1].meshes()[0].indices()[..3], &[0, 2, 1]);
}

#[test]
fn should_flatten_gltf_node_transforms() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "nested.gltf", NESTED_GLTF);

    let imported = import_model(&path, ImportFlags::default()).unwrap();
    let scene = &imported.scene;

    assert_eq!(scene.parts().len(), 1);
    assert_eq!(scene.parts()[0].name(), "wheel");
    let mesh = &scene.parts()[0].meshes()[0];
    assert_eq!(mesh.name(), "rim_0");
    assert_eq!(mesh.face_count(), 1);
    assert_eq!(mesh.local_transform().w, model_viewer::Vector4::new(1.0, 2.0, 8.0, 1.0));
}

#[test]
fn should_extract_gltf_images_from_views_and_data_uris() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "panel.gltf", &textured_gltf());
    let mut viewer = Viewer::default();

    viewer.load_model(&path).unwrap();

    let list = viewer.textures().list();
    let found: Vec<_> = list
        .iter()
        .map(|info| (info.name.as_str(), info.width, info.height))
        .collect();
    assert_eq!(found, vec![("paint", 3, 2), ("decal", 5, 4)]);
    assert_eq!(viewer.model().unwrap().scene().parts()[0].name(), "panel");
}

#[test]
fn should_fan_polygons_without_triangulation() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "quad.obj",
        "o quad\nv 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
    );
    let flags = ImportFlags::default().difference(ImportFlags::TRIANGULATE);

    let imported = import_model(&path, flags).unwrap();
    let mesh = &imported.scene.parts()[0].meshes()[0];

    assert_eq!(mesh.face_count(), 2);
    assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3]);
}

#[test]
fn should_reject_unsupported_formats() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "model.fbx", "not a model");

    let err = import_model(&path, ImportFlags::default()).err().unwrap();

    assert!(format!("{:#}", err).contains("unsupported model format 'fbx'"));
}

#[test]
fn should_keep_previous_model_when_import_fails() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);
    let mut viewer = Viewer::default();
    viewer.load_model(&good).unwrap();
    let model = viewer.model_mut().unwrap();
    editor::set_position(model.overrides_mut(), Target::Model, Vector3::new(1.0, 0.0, 0.0));

    let result = viewer.load_model(&dir.path().join("missing.obj"));

    assert!(result.is_err());
    let model = viewer.model().unwrap();
    assert_eq!(model.name(), "two.obj");
    assert_eq!(model.overrides().transform.position, Vector3::new(1.0, 0.0, 0.0));
    assert!(viewer.status().message().unwrap().starts_with("Failed to load"));
}

#[test]
fn should_replace_overrides_on_swap() {
    let dir = tempfile::tempdir().unwrap();
    let two = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);
    let single = write_file(dir.path(), "single.obj", SINGLE_OBJECT_OBJ);
    let mut viewer = Viewer::default();
    viewer.load_model(&two).unwrap();
    editor::set_locating(viewer.model_mut().unwrap().overrides_mut(), 0, 0, true);

    viewer.load_model(&single).unwrap();

    let model = viewer.model().unwrap();
    assert_eq!(model.overrides().parts().len(), 1);
    assert!(!model.overrides().any_locating());
    assert_eq!(viewer.status().message(), Some("Loaded model single.obj"));
    assert_eq!(viewer.resolve_at(0.0).len(), 1);
}

#[test]
fn should_drop_embedded_textures_but_keep_loaded_ones() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "skin.png", 4, 2);
    let user_png = write_png(dir.path(), "user.png", 8, 8);
    write_file(dir.path(), "skin.mtl", "newmtl skin\nmap_Kd skin.png\n");
    let skinned = write_file(dir.path(), "skinned.obj", SKINNED_OBJ);
    let plain = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);
    let mut viewer = Viewer::default();

    viewer.load_model(&skinned).unwrap();
    let user = viewer.load_textures(&[user_png]).unwrap();

    assert_eq!(viewer.model().unwrap().scene().parts()[0].meshes()[0].name(), "skin");
    let names: Vec<_> = viewer.textures().list().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["skin.png", "user.png"]);

    viewer.load_model(&plain).unwrap();

    let names: Vec<_> = viewer.textures().list().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["user.png"]);
    assert!(viewer.textures().contains(user[0]));
}

#[test]
fn should_report_loaded_textures() {
    let dir = tempfile::tempdir().unwrap();
    let a = write_png(dir.path(), "a.png", 2, 2);
    let b = write_png(dir.path(), "b.png", 3, 1);
    let mut viewer = Viewer::default();

    let ids = viewer.load_textures(&[a, b]).unwrap();

    assert_eq!(ids.len(), 2);
    assert_eq!(viewer.status().message(), Some("Loaded textures\na.png\nb.png"));
    let info = &viewer.textures().list()[1];
    assert_eq!((info.width, info.height), (3, 1));

    assert!(viewer.load_textures(&[dir.path().join("nope.png")]).is_err());
    assert_eq!(viewer.textures().len(), 2);
}

#[test]
fn should_not_reload_without_model() {
    let mut viewer = Viewer::default();

    assert!(!viewer.reload_model().unwrap());
    assert_eq!(viewer.status().message(), Some("No model to reload"));
    assert!(viewer.resolve_at(0.0).is_empty());
}

#[test]
fn should_reimport_with_new_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);
    let mut viewer = Viewer::default();
    viewer.load_model(&path).unwrap();
    editor::set_position(
        viewer.model_mut().unwrap().overrides_mut(),
        Target::Model,
        Vector3::new(4.0, 0.0, 0.0),
    );

    viewer
        .config_mut()
        .import_flags
        .toggle_step(ImportFlags::GENERATE_NORMALS);
    assert!(viewer.reload_model().unwrap());

    let model = viewer.model().unwrap();
    assert_eq!(model.scene().parts()[0].meshes()[0].vertex_count(), 6);
    assert_eq!(model.overrides().transform.position, Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn should_restore_saved_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);
    let brick = write_png(dir.path(), "brick.png", 2, 2);
    let config_path = dir.path().join("two.ron");

    let mut viewer = Viewer::default();
    viewer.load_model(&model_path).unwrap();
    let ids = viewer.load_textures(&[brick.clone()]).unwrap();
    viewer.assign_texture(1, 0, ids[0]).unwrap();
    {
        let overrides = viewer.model_mut().unwrap().overrides_mut();
        editor::set_position(overrides, Target::Model, Vector3::new(1.0, 2.0, 3.0));
        editor::set_mesh_use_parent_transform(overrides, 1, 0, false);
        editor::set_position(
            overrides,
            Target::Mesh { part: 1, mesh: 0 },
            Vector3::new(0.0, 5.0, 0.0),
        );
        editor::set_color(overrides, 1, 0, Vector3::new(0.25, 0.5, 0.75));
        editor::set_use_texture(overrides, 1, 0, true);
        editor::set_locating(overrides, 0, 0, true);
    }
    let saved = viewer.save_overrides(Some(&config_path)).unwrap();
    assert_eq!(saved, config_path);
    assert_eq!(viewer.status().message(), Some("Saved config two.ron"));

    let mut restored = Viewer::default();
    restored.load_model(&model_path).unwrap();
    let new_ids = restored.load_textures(&[brick]).unwrap();
    restored.load_overrides(&config_path).unwrap();

    let original = viewer.model().unwrap().overrides();
    let overrides = restored.model().unwrap().overrides();
    assert_eq!(overrides.transform, original.transform);
    assert!(overrides.use_parent_transform());
    let mesh = overrides.mesh(1, 0);
    assert!(!mesh.use_parent_transform);
    assert_eq!(mesh.transform.position, Vector3::new(0.0, 5.0, 0.0));
    assert_eq!(mesh.color, Vector3::new(0.25, 0.5, 0.75));
    assert!(mesh.use_texture);
    assert_eq!(mesh.texture, Some(new_ids[0]));
    // highlighting is a transient view state
    assert!(!overrides.any_locating());
    assert_eq!(restored.resolve_at(0.0)[1].texture, Some(new_ids[0]));
}

#[test]
fn should_drop_unknown_texture_names_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);
    let brick = write_png(dir.path(), "brick.png", 2, 2);
    let config_path = dir.path().join("two.ron");
    let mut viewer = Viewer::default();
    viewer.load_model(&model_path).unwrap();
    let ids = viewer.load_textures(&[brick]).unwrap();
    viewer.assign_texture(0, 0, ids[0]).unwrap();
    editor::set_use_texture(viewer.model_mut().unwrap().overrides_mut(), 0, 0, true);
    viewer.save_overrides(Some(&config_path)).unwrap();

    // a fresh session that never loaded brick.png
    let mut restored = Viewer::default();
    restored.load_model(&model_path).unwrap();
    restored.load_overrides(&config_path).unwrap();

    let mesh = restored.model().unwrap().overrides().mesh(0, 0);
    assert!(mesh.use_texture);
    assert_eq!(mesh.texture, None);
    let draw = &restored.resolve_at(0.0)[0];
    assert!(!draw.use_texture);
    assert_eq!(draw.texture, None);
}

#[test]
fn should_reuse_last_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);
    let config_path = dir.path().join("view.ron");
    let mut viewer = Viewer::default();
    viewer.load_model(&model_path).unwrap();

    assert!(viewer.save_overrides(None).is_err());
    viewer.save_overrides(Some(&config_path)).unwrap();
    editor::set_color(
        viewer.model_mut().unwrap().overrides_mut(),
        0,
        0,
        Vector3::new(0.0, 1.0, 0.0),
    );
    assert_eq!(viewer.save_overrides(None).unwrap(), config_path);

    let config = OverrideConfig::load(&config_path).unwrap();
    assert_eq!(config.model, "two.obj");
    assert_eq!(config.parts[0].meshes[0].color, [0.0, 1.0, 0.0]);
}

#[test]
fn should_refuse_config_of_another_layout() {
    let dir = tempfile::tempdir().unwrap();
    let two = write_file(dir.path(), "two.obj", TWO_OBJECTS_OBJ);
    let single = write_file(dir.path(), "single.obj", SINGLE_OBJECT_OBJ);
    let config_path = dir.path().join("two.ron");
    let mut viewer = Viewer::default();
    viewer.load_model(&two).unwrap();
    editor::set_position(
        viewer.model_mut().unwrap().overrides_mut(),
        Target::Model,
        Vector3::new(9.0, 9.0, 9.0),
    );
    viewer.save_overrides(Some(&config_path)).unwrap();

    viewer.load_model(&single).unwrap();
    let result = viewer.load_overrides(&config_path);

    assert!(result.is_err());
    let overrides = viewer.model().unwrap().overrides();
    assert_eq!(overrides.transform.position, Vector3::new(0.0, 0.0, 0.0));
}

#[test]
fn should_hide_status_after_duration() {
    let mut status = StatusLine::default();
    assert_eq!(status.message(), None);

    status.set("Loaded model car.obj");
    status.tick(3.0, 5.0);
    assert_eq!(status.message(), Some("Loaded model car.obj"));

    status.tick(2.5, 5.0);
    assert_eq!(status.message(), None);

    status.set("again");
    assert_eq!(status.message(), Some("again"));
}

#[test]
fn should_keep_normal_generation_exclusive() {
    let mut flags = ImportFlags::default();
    assert!(flags.contains(ImportFlags::GENERATE_SMOOTH_NORMALS));

    flags.toggle_step(ImportFlags::GENERATE_NORMALS);
    assert!(flags.contains(ImportFlags::GENERATE_NORMALS));
    assert!(!flags.contains(ImportFlags::GENERATE_SMOOTH_NORMALS));

    flags.toggle_step(ImportFlags::GENERATE_SMOOTH_NORMALS);
    assert!(flags.contains(ImportFlags::GENERATE_SMOOTH_NORMALS));
    assert!(!flags.contains(ImportFlags::GENERATE_NORMALS));

    flags.toggle_step(ImportFlags::GENERATE_SMOOTH_NORMALS);
    assert!(!flags.intersects(ImportFlags::GENERATE_NORMALS | ImportFlags::GENERATE_SMOOTH_NORMALS));
}

#[test]
fn should_strip_both_path_separators() {
    assert_eq!(display_name("C:\\models\\car.obj"), "car.obj");
    assert_eq!(display_name("assets/models/car.gltf"), "car.gltf");
    assert_eq!(display_name("car.glb"), "car.glb");
}
