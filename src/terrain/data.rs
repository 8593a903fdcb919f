//! Terrain data: the canonical vertex and triangle records of one generated
//! world, plus the spatial indexes built over them.

use glam::Vec3;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::TerrainError;
use crate::color::Color;
use crate::geometry::{Aabb, GeometryError, Mesh, MeshBuffers, Ray};
use crate::sampling::{point_in_triangle, CumulativeAreaTable, SamplingError, WeightedSurfaceSampler};
use crate::spatial::{BoundsOctree, OctreeConfig, PointOctree};

/// Stable handle to a vertex in [`TerrainData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

/// Stable handle to a triangle in [`TerrainData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriangleId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TriangleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainVertex {
    pub id: VertexId,
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Color,
}

/// A triangle with its area and bounds cached at build time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainTriangle {
    pub vertices: [VertexId; 3],
    pub area: f32,
    pub bounds: Aabb,
}

impl TerrainTriangle {
    pub fn corners(&self, vertices: &[TerrainVertex]) -> [Vec3; 3] {
        self.vertices.map(|id| vertices[id.index()].position)
    }

    /// Uniformly distributed point inside the triangle.
    pub fn random_point<R: Rng + ?Sized>(&self, vertices: &[TerrainVertex], rng: &mut R) -> Vec3 {
        let [a, b, c] = self.corners(vertices);
        point_in_triangle(a, b, c, rng.random(), rng.random())
    }
}

/// Owns every vertex and triangle of a generated terrain.
///
/// Immutable once built; a new generation pass builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainData {
    vertices: Vec<TerrainVertex>,
    triangles: Vec<TerrainTriangle>,
}

impl TerrainData {
    pub fn vertices(&self) -> &[TerrainVertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[TerrainTriangle] {
        &self.triangles
    }

    pub fn vertex(&self, id: VertexId) -> Option<&TerrainVertex> {
        self.vertices.get(id.index())
    }

    pub fn triangle(&self, id: TriangleId) -> Option<&TerrainTriangle> {
        self.triangles.get(id.index())
    }

    pub fn triangle_corners(&self, id: TriangleId) -> Option<[Vec3; 3]> {
        self.triangle(id).map(|t| t.corners(&self.vertices))
    }

    pub fn surface_area(&self) -> f32 {
        self.triangles.iter().map(|t| t.area).sum()
    }

    /// Re-derives the renderer buffers, in vertex and triangle order.
    pub fn to_buffers(&self) -> MeshBuffers {
        MeshBuffers {
            positions: self.vertices.iter().map(|v| v.position.to_array()).collect(),
            normals: self.vertices.iter().map(|v| v.normal.to_array()).collect(),
            colors: self.vertices.iter().map(|v| v.color.to_array()).collect(),
            indices: self
                .triangles
                .iter()
                .flat_map(|t| t.vertices.map(|id| id.0))
                .collect(),
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        Mesh {
            positions: self.vertices.iter().map(|v| v.position).collect(),
            normals: self.vertices.iter().map(|v| v.normal).collect(),
            colors: self.vertices.iter().map(|v| v.color).collect(),
            triangles: self.triangles.iter().map(|t| t.vertices.map(|id| id.0)).collect(),
        }
    }
}

/// Octree settings for the two terrain indexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    pub triangles: OctreeConfig,
    pub vertices: OctreeConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            triangles: OctreeConfig::triangles(),
            vertices: OctreeConfig::vertices(),
        }
    }
}

/// Nearest triangle hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub triangle: TriangleId,
    pub distance: f32,
    pub point: Vec3,
}

/// Terrain data with its cumulative area table and spatial indexes.
///
/// The indexes hold handles into `data`, never copies of geometry.
#[derive(Debug, Clone)]
pub struct Terrain {
    data: TerrainData,
    areas: CumulativeAreaTable,
    triangle_index: BoundsOctree<TriangleId>,
    vertex_index: PointOctree<VertexId>,
}

impl Terrain {
    pub fn data(&self) -> &TerrainData {
        &self.data
    }

    pub fn areas(&self) -> &CumulativeAreaTable {
        &self.areas
    }

    pub fn triangle_index(&self) -> &BoundsOctree<TriangleId> {
        &self.triangle_index
    }

    pub fn vertex_index(&self) -> &PointOctree<VertexId> {
        &self.vertex_index
    }

    /// Area-weighted sampler over this terrain's surface.
    pub fn sampler(&self) -> Result<WeightedSurfaceSampler<'_>, SamplingError> {
        WeightedSurfaceSampler::new(&self.data, &self.areas)
    }

    /// Triangles whose bounding boxes the ray crosses.
    pub fn triangles_along(&self, ray: &Ray) -> Vec<TriangleId> {
        self.triangle_index.colliding(ray)
    }

    /// Closest triangle the ray actually hits.
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        self.triangles_along(ray)
            .into_iter()
            .filter_map(|id| {
                let [a, b, c] = self.data.triangle_corners(id)?;
                let distance = ray.intersect_triangle(a, b, c)?;
                Some(RayHit {
                    triangle: id,
                    distance,
                    point: ray.at(distance),
                })
            })
            .min_by(|x, y| x.distance.total_cmp(&y.distance))
    }

    pub fn vertices_within(&self, region: &Aabb) -> Vec<VertexId> {
        self.vertex_index.query_region(region)
    }

    pub fn vertices_near_ray(&self, ray: &Ray, max_distance: f32) -> Vec<VertexId> {
        self.vertex_index.nearby(ray, max_distance)
    }
}

/// Builds terrain data, area table and both indexes from a finished mesh.
///
/// Fails on an empty mesh or inconsistent attribute arrays; never returns a
/// partially built terrain.
pub fn build_terrain(mesh: &Mesh, index: &IndexConfig) -> Result<Terrain, TerrainError> {
    if mesh.triangles.is_empty() {
        return Err(TerrainError::EmptyMesh);
    }
    mesh.validate()?;
    if mesh.vertex_count() > u32::MAX as usize || mesh.triangle_count() > u32::MAX as usize {
        return Err(GeometryError::TooManyVertices(mesh.vertex_count()).into());
    }

    let vertices: Vec<TerrainVertex> = mesh
        .positions
        .par_iter()
        .zip(mesh.normals.par_iter())
        .zip(mesh.colors.par_iter())
        .enumerate()
        .map(|(i, ((&position, &normal), &color))| TerrainVertex {
            id: VertexId(i as u32),
            position,
            normal,
            color,
        })
        .collect();

    let triangles: Vec<TerrainTriangle> = mesh
        .triangles
        .par_iter()
        .map(|&[a, b, c]| {
            let (pa, pb, pc) = (
                mesh.positions[a as usize],
                mesh.positions[b as usize],
                mesh.positions[c as usize],
            );
            TerrainTriangle {
                vertices: [VertexId(a), VertexId(b), VertexId(c)],
                area: 0.5 * (pb - pa).cross(pc - pa).length(),
                bounds: Aabb::from_triangle(pa, pb, pc),
            }
        })
        .collect();

    let areas = CumulativeAreaTable::from_areas(triangles.iter().map(|t| t.area));

    let vertex_index =
        PointOctree::build(&index.vertices, vertices.iter().map(|v| (v.id, v.position)))?;
    let triangle_index = BoundsOctree::build(
        &index.triangles,
        triangles
            .iter()
            .enumerate()
            .map(|(i, t)| (TriangleId(i as u32), t.bounds)),
    )?;

    tracing::debug!(
        vertices = vertices.len(),
        triangles = triangles.len(),
        total_area = areas.total(),
        triangle_nodes = triangle_index.node_count(),
        vertex_nodes = vertex_index.node_count(),
        "Built terrain data"
    );

    Ok(Terrain {
        data: TerrainData {
            vertices,
            triangles,
        },
        areas,
        triangle_index,
        vertex_index,
    })
}
