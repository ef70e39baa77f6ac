//! The scene: one shared box geometry, its coloured instances and the lights.
//!
//! The scene is plain data. GPU resources mirror it in
//! [`SceneResources`](crate::render::SceneResources) and are refreshed from it
//! every frame.

use cgmath::{Rad, Rotation3, Vector3};

use crate::{
    config::{CubeSpec, DemoConfig, LightConfig, srgb_hex_to_linear},
    data_structures::{geometry::BoxGeometry, instance::Instance},
};

/// A light shining from `position` towards the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: Vector3<f32>,
    /// Linear RGB.
    pub colour: [f32; 3],
    pub intensity: f32,
}

impl From<&LightConfig> for DirectionalLight {
    fn from(config: &LightConfig) -> Self {
        Self {
            position: config.position.into(),
            colour: srgb_hex_to_linear(config.colour),
            intensity: config.intensity,
        }
    }
}

/// Index of a mesh inside its [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(usize);

impl MeshHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One drawable cube. The position is fixed at creation, the rotation is
/// animated.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshInstance {
    /// Linear RGB material colour.
    colour: [f32; 3],
    position: Vector3<f32>,
    /// Rotation around the x and y axes in radians, applied x first.
    pub rotation: (f32, f32),
}

impl MeshInstance {
    pub fn new(colour: [f32; 3], x: f32) -> Self {
        Self {
            colour,
            position: Vector3::new(x, 0.0, 0.0),
            rotation: (0.0, 0.0),
        }
    }

    pub fn colour(&self) -> [f32; 3] {
        self.colour
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn to_instance(&self) -> Instance {
        let (x, y) = self.rotation;
        Instance {
            position: self.position,
            rotation: cgmath::Quaternion::from_angle_x(Rad(x))
                * cgmath::Quaternion::from_angle_y(Rad(y)),
            colour: self.colour,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    geometry: BoxGeometry,
    /// sRGB hex clear colour.
    background: Option<u32>,
    lights: Vec<DirectionalLight>,
    meshes: Vec<MeshInstance>,
}

impl Scene {
    pub fn new(geometry: BoxGeometry) -> Self {
        Self {
            geometry,
            ..Default::default()
        }
    }

    pub fn with_background(mut self, background: Option<u32>) -> Self {
        self.background = background;
        self
    }

    pub fn add_light(&mut self, light: DirectionalLight) {
        self.lights.push(light);
    }

    pub fn add_mesh(&mut self, mesh: MeshInstance) -> MeshHandle {
        self.meshes.push(mesh);
        MeshHandle(self.meshes.len() - 1)
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshInstance> {
        self.meshes.get(handle.0)
    }

    pub fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut MeshInstance> {
        self.meshes.get_mut(handle.0)
    }

    pub fn meshes(&self) -> &[MeshInstance] {
        &self.meshes
    }

    pub fn lights(&self) -> &[DirectionalLight] {
        &self.lights
    }

    pub fn geometry(&self) -> &BoxGeometry {
        &self.geometry
    }

    pub fn background(&self) -> Option<u32> {
        self.background
    }
}

/// Build a scene with one light and one cube per [`CubeSpec`], all sharing `geometry`.
///
/// The returned handles are in the order of `specs`.
pub fn build_scene(
    light: DirectionalLight,
    geometry: BoxGeometry,
    specs: &[CubeSpec],
) -> (Scene, Vec<MeshHandle>) {
    let mut scene = Scene::new(geometry);
    scene.add_light(light);
    let handles = specs
        .iter()
        .map(|spec| scene.add_mesh(MeshInstance::new(srgb_hex_to_linear(spec.colour), spec.x)))
        .collect();
    (scene, handles)
}

/// [`build_scene`] driven by a [`DemoConfig`], background included.
pub fn build_scene_from_config(config: &DemoConfig) -> (Scene, Vec<MeshHandle>) {
    let (scene, handles) = build_scene(
        (&config.light).into(),
        config.box_size.into(),
        &config.cubes,
    );
    (scene.with_background(config.background), handles)
}
