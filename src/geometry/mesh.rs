//! Indexed triangle mesh and the flat buffers exchanged with a host renderer.

use glam::Vec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::GeometryError;
use crate::color::Color;

/// An indexed triangle mesh with per-vertex normals and colours.
///
/// `positions`, `normals` and `colors` are parallel arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<Color>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Corner positions of triangle `index`.
    pub fn triangle_corners(&self, index: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[index];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Checks that the vertex attribute arrays agree and that every index
    /// refers to an existing vertex.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let count = self.positions.len();
        if self.normals.len() != count || self.colors.len() != count {
            return Err(GeometryError::AttributeMismatch {
                positions: count,
                normals: self.normals.len(),
                colors: self.colors.len(),
            });
        }
        for (triangle, indices) in self.triangles.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= count) {
                return Err(GeometryError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: count,
                });
            }
        }
        Ok(())
    }

    /// Replaces the normals with area-weighted averages of the adjacent face
    /// normals.
    ///
    /// Vertices are not welded, so duplicated edge vertices keep the normal of
    /// their own base-triangle grid.
    pub fn recompute_normals(&mut self) {
        let mut accumulated = vec![Vec3::ZERO; self.positions.len()];
        for &[a, b, c] in &self.triangles {
            let (pa, pb, pc) = (
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            );
            // Cross product length is twice the area, giving area weighting.
            let face = (pb - pa).cross(pc - pa);
            accumulated[a as usize] += face;
            accumulated[b as usize] += face;
            accumulated[c as usize] += face;
        }

        self.normals = accumulated
            .into_par_iter()
            .zip(self.positions.par_iter())
            .map(|(n, p)| n.try_normalize().unwrap_or_else(|| p.normalize_or_zero()))
            .collect();
    }

    /// Flattens the mesh into host-facing buffers.
    pub fn to_buffers(&self) -> MeshBuffers {
        MeshBuffers {
            positions: self.positions.iter().map(|p| p.to_array()).collect(),
            normals: self.normals.iter().map(|n| n.to_array()).collect(),
            colors: self.colors.iter().map(|c| c.to_array()).collect(),
            indices: self.triangles.iter().flatten().copied().collect(),
        }
    }

    /// Rebuilds a mesh from host buffers, validating lengths and indices.
    pub fn from_buffers(buffers: &MeshBuffers) -> Result<Self, GeometryError> {
        if buffers.indices.len() % 3 != 0 {
            return Err(GeometryError::RaggedIndices(buffers.indices.len()));
        }
        let mesh = Mesh {
            positions: buffers.positions.iter().map(|&p| Vec3::from_array(p)).collect(),
            normals: buffers.normals.iter().map(|&n| Vec3::from_array(n)).collect(),
            colors: buffers.colors.iter().map(|&c| Color::from_array(c)).collect(),
            triangles: buffers
                .indices
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
        };
        mesh.validate()?;
        Ok(mesh)
    }
}

/// Flat vertex and index arrays, the form a renderer uploads.
///
/// Indices are 32-bit: subdivided meshes pass 65535 vertices quickly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffers {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}
