//! Engine data structures: scene, geometry, instances, meshes and textures.
//!
//! - `scene` holds the scene graph the demo is built from (lights and cubes)
//! - `geometry` generates the shared box geometry
//! - `model` contains the vertex layout and GPU meshes
//! - `instance` holds per-instance transformation and colour data
//! - `texture` contains the depth texture wrapper

pub mod geometry;
pub mod instance;
pub mod model;
pub mod scene;
pub mod texture;
