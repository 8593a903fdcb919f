//! Geodesic-sphere geometry module.
//!
//! Provides the base polyhedra, their subdivision into a geodesic sphere,
//! the indexed mesh representation, and the box/ray primitives used by the
//! spatial indexes.

mod aabb;
mod base_shape;
mod mesh;
mod subdivide;

use thiserror::Error;

pub use aabb::{Aabb, Ray};
pub use base_shape::BaseShape;
pub use mesh::{Mesh, MeshBuffers};
pub use subdivide::{grid_triangle_count, grid_vertex_count, subdivide, subdivided_counts};

/// Errors raised while building or validating geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Subdivision level must be at least 1, got {0}")]
    InvalidSubdivision(u32),
    #[error("Radius must be finite and positive, got {0}")]
    InvalidRadius(f32),
    #[error("Subdividing a {shape} at level {level} needs more elements than 32-bit indices can address")]
    SubdivisionTooDense { shape: BaseShape, level: u32 },
    #[error("Mesh has {0} vertices, more than 32-bit indices can address")]
    TooManyVertices(usize),
    #[error("Vertex attribute lengths differ: {positions} positions, {normals} normals, {colors} colors")]
    AttributeMismatch {
        positions: usize,
        normals: usize,
        colors: usize,
    },
    #[error("Triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("Index buffer length {0} is not a multiple of 3")]
    RaggedIndices(usize),
}
