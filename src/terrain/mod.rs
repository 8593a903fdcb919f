//! Terrain shaping and the terrain data model.
//!
//! Height displacement and colouring operate on a [`Mesh`](crate::geometry::Mesh)
//! in place; [`build_terrain`] then freezes the finished mesh into
//! [`TerrainData`] with its area table and spatial indexes.

mod colorize;
mod data;
mod displace;

use thiserror::Error;

use crate::geometry::GeometryError;
use crate::spatial::SpatialError;

pub use colorize::SurfaceColorizer;
pub use data::{
    build_terrain, IndexConfig, RayHit, Terrain, TerrainData, TerrainTriangle, TerrainVertex,
    TriangleId, VertexId,
};
pub use displace::HeightDisplacer;

/// Errors raised while building terrain data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("Mesh has no triangles")]
    EmptyMesh,
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("Spatial index build failed: {0}")]
    Spatial(#[from] SpatialError),
}
