//! Procedural box geometry.

use cgmath::{ElementWise, Vector3};

use crate::data_structures::model::ModelVertex;

/// An axis aligned box centred on the origin.
///
/// Each face gets its own four vertices so normals stay flat, which gives
/// 24 vertices and 36 indices in total.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxGeometry {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

// (normal, u, v) with u x v == normal so every face winds counter-clockwise
// when seen from outside.
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

impl BoxGeometry {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn build(&self) -> (Vec<ModelVertex>, Vec<u16>) {
        let half = Vector3::new(self.width, self.height, self.depth) * 0.5;
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in FACES {
            let n = Vector3::from(normal);
            let centre = n.mul_element_wise(half);
            let u = Vector3::from(u).mul_element_wise(half);
            let v = Vector3::from(v).mul_element_wise(half);
            let base = vertices.len() as u16;
            for corner in [centre - u - v, centre + u - v, centre + u + v, centre - u + v] {
                vertices.push(ModelVertex {
                    position: corner.into(),
                    normal,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        (vertices, indices)
    }
}

impl From<[f32; 3]> for BoxGeometry {
    fn from([width, height, depth]: [f32; 3]) -> Self {
        Self::new(width, height, depth)
    }
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::InnerSpace;

    use super::*;

    #[test]
    fn faces_wind_outwards() {
        let (vertices, indices) = BoxGeometry::new(1.0, 2.0, 3.0).build();
        assert_eq!(vertices.len(), 24);
        assert_eq!(indices.len(), 36);
        for tri in indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vector3::from(vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a).normalize();
            let normal = Vector3::from(vertices[tri[0] as usize].normal);
            assert!((face_normal - normal).magnitude() < 1e-5);
        }
    }

    #[test]
    fn extents_match_dimensions() {
        let (vertices, _) = BoxGeometry::new(1.0, 2.0, 3.0).build();
        let max = vertices.iter().fold([f32::MIN; 3], |acc, v| {
            [acc[0].max(v.position[0]), acc[1].max(v.position[1]), acc[2].max(v.position[2])]
        });
        assert_eq!(max, [0.5, 1.0, 1.5]);
    }
}
