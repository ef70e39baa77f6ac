use flow_cubes::{
    config::{CubeSpec, DemoConfig, srgb_hex_to_linear},
    data_structures::{
        geometry::BoxGeometry,
        scene::{DirectionalLight, MeshInstance, Scene, build_scene, build_scene_from_config},
    },
};

fn white_light() -> DirectionalLight {
    DirectionalLight {
        position: [-1.0, 2.0, 4.0].into(),
        colour: [1.0; 3],
        intensity: 3.0,
    }
}

#[test]
fn should_build_one_instance_per_cube_in_order() {
    let specs = [
        CubeSpec::new(0x44aa88, 0.0),
        CubeSpec::new(0x8844aa, -2.0),
        CubeSpec::new(0xaa8844, 2.0),
    ];

    let (scene, handles) = build_scene(white_light(), BoxGeometry::default(), &specs);

    assert_eq!(scene.meshes().len(), 3);
    assert_eq!(handles.len(), 3);
    for (spec, handle) in specs.iter().zip(&handles) {
        let mesh = scene.mesh(*handle).expect("handle points into the scene");
        assert_eq!(mesh.position().x, spec.x);
        assert_eq!(mesh.position().y, 0.0);
        assert_eq!(mesh.position().z, 0.0);
        assert_eq!(mesh.colour(), srgb_hex_to_linear(spec.colour));
        assert_eq!(mesh.rotation, (0.0, 0.0));
    }
    assert_eq!(
        handles.iter().map(|h| h.index()).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn should_add_exactly_one_light() {
    let (scene, _) = build_scene(
        white_light(),
        BoxGeometry::default(),
        &[CubeSpec::new(0xff0000, 0.0), CubeSpec::new(0x00ff00, 1.0)],
    );

    assert_eq!(scene.lights(), &[white_light()]);
}

#[test]
fn should_share_one_geometry() {
    let geometry = BoxGeometry::new(1.0, 2.0, 3.0);
    let (scene, _) = build_scene(white_light(), geometry, &[CubeSpec::new(0xffffff, 0.0)]);

    assert_eq!(scene.geometry(), &geometry);
}

#[test]
fn should_build_an_empty_scene_without_specs() {
    let (scene, handles) = build_scene(white_light(), BoxGeometry::default(), &[]);

    assert!(scene.meshes().is_empty());
    assert!(handles.is_empty());
    assert_eq!(scene.lights().len(), 1);
}

#[test]
fn should_keep_background_from_config() {
    let (responsive, _) = build_scene_from_config(&DemoConfig::responsive());
    let (basic, _) = build_scene_from_config(&DemoConfig::basic());

    assert_eq!(responsive.background(), Some(0xaaaaaa));
    assert_eq!(basic.background(), None);
    assert_eq!(responsive.meshes().len(), 3);
}

#[test]
fn should_rotate_around_x_then_y() {
    use cgmath::{InnerSpace, Rotation};

    let mut mesh = MeshInstance::new([1.0; 3], 0.0);
    mesh.rotation = (std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2);
    let rotation = mesh.to_instance().rotation;

    // Ry first turns +z into +x, Rx leaves +x alone.
    let v = rotation.rotate_vector(cgmath::Vector3::unit_z());
    assert!((v - cgmath::Vector3::unit_x()).magnitude() < 1e-5, "{:?}", v);
}

#[test]
fn should_return_none_for_foreign_handles() {
    let (_, handles) = build_scene(white_light(), BoxGeometry::default(), &[CubeSpec::new(0, 0.0)]);
    let empty = Scene::default();

    assert!(empty.mesh(handles[0]).is_none());
}

#[test]
fn should_upload_position_and_colour_per_instance() {
    let config = DemoConfig::responsive();
    let (scene, _) = build_scene_from_config(&config);

    for (mesh, spec) in scene.meshes().iter().zip(&config.cubes) {
        let raw = mesh.to_instance().to_raw();
        // translation lives in the last column of the model matrix
        assert_eq!(raw.model()[3], [spec.x, 0.0, 0.0, 1.0]);
        assert_eq!(raw.colour(), srgb_hex_to_linear(spec.colour));
    }
}
