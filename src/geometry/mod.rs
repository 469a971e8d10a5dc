//! CPU side geometry.
//!
//! Everything here produces a [`MeshData`]: plain vectors of positions,
//! normals, uvs and triangle indices that `Mesh::from_data` uploads to the GPU.
//! Uvs follow the GL convention (v grows upwards) and are flipped when
//! converted to [`ModelVertex`].

pub mod extrude;
pub mod path;
pub mod primitives;
pub mod text;
pub mod triangulate;

use cgmath::Vector3;

use crate::data_structures::model::ModelVertex;

pub use extrude::{ExtrudeOptions, extrude_shapes};
pub use path::{Shape, ShapePath};
pub use primitives::{plane, sphere, torus};
pub use text::{TextOptions, text};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

/// Axis aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        let idx = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        idx
    }

    pub fn vertices(&self) -> Vec<ModelVertex> {
        self.positions
            .iter()
            .zip(self.normals.iter())
            .zip(self.uvs.iter())
            .map(|((position, normal), uv)| ModelVertex {
                position: *position,
                tex_coords: [uv[0], 1.0 - uv[1]],
                normal: *normal,
            })
            .collect()
    }

    pub fn bounding_box(&self) -> Option<Aabb> {
        let first = Vector3::from(*self.positions.first()?);
        Some(self.positions.iter().fold(
            Aabb {
                min: first,
                max: first,
            },
            |aabb, p| Aabb {
                min: Vector3::new(aabb.min.x.min(p[0]), aabb.min.y.min(p[1]), aabb.min.z.min(p[2])),
                max: Vector3::new(aabb.max.x.max(p[0]), aabb.max.y.max(p[1]), aabb.max.z.max(p[2])),
            },
        ))
    }

    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        for p in self.positions.iter_mut() {
            p[0] += x;
            p[1] += y;
            p[2] += z;
        }
        self
    }

    /// Move the geometry so its bounding box is centred on the origin.
    pub fn center(&mut self) -> &mut Self {
        if let Some(aabb) = self.bounding_box() {
            let c = aabb.center();
            self.translate(-c.x, -c.y, -c.z);
        }
        self
    }

    /// Append a mirrored copy of every triangle so the surface is visible from
    /// both sides with back-face culling on.
    pub fn double_sided(&mut self) -> &mut Self {
        let offset = self.positions.len() as u32;
        let back_normals = self
            .normals
            .iter()
            .map(|n| [-n[0], -n[1], -n[2]])
            .collect::<Vec<_>>();
        self.positions.extend_from_within(..);
        self.uvs.extend_from_within(..);
        self.normals.extend(back_normals);
        let back_faces = self
            .indices
            .chunks_exact(3)
            .flat_map(|t| [t[0] + offset, t[2] + offset, t[1] + offset])
            .collect::<Vec<_>>();
        self.indices.extend(back_faces);
        self
    }

    /// Append `other`, shifting its indices.
    pub fn merge(&mut self, other: &MeshData) -> &mut Self {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
        self
    }
}
