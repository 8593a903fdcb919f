//! Geodesic subdivision of a base polyhedron by index arithmetic.
//!
//! Each base triangle owns a triangular grid of `(k + 1)(k + 2) / 2` points
//! laid out row by row: row `r` holds `r + 1` points starting at local index
//! `r(r + 1) / 2`, walking from the `v0 -> v1` edge to the `v0 -> v2` edge.
//! Row `r` emits `2r + 1` triangles starting at local triangle `r²`,
//! alternating "even" (pointing away from `v0`) and "odd" (pointing toward
//! it). Points on an edge shared by two base triangles are generated by both
//! grids and are not merged.

use glam::Vec3;
use rayon::prelude::*;
use tracing::debug;

use super::base_shape::BaseShape;
use super::mesh::Mesh;
use super::GeometryError;
use crate::color::Color;

/// Number of grid points a single base triangle produces at `level`, or
/// `None` when it overflows `usize`.
pub fn grid_vertex_count(level: u32) -> Option<usize> {
    let k = usize::try_from(level).ok()?;
    let rows = k.checked_add(1)?;
    let points = rows.checked_mul(k.checked_add(2)?)?;
    Some(points / 2)
}

/// Number of triangles a single base triangle produces at `level`, or `None`
/// when it overflows `usize`.
pub fn grid_triangle_count(level: u32) -> Option<usize> {
    let k = usize::try_from(level).ok()?;
    k.checked_mul(k)
}

/// Total `(vertices, triangles)` of a subdivided shape, duplicates included.
///
/// # Errors
/// [`GeometryError::SubdivisionTooDense`] when either count does not fit
/// 32-bit indices.
pub fn subdivided_counts(shape: BaseShape, level: u32) -> Result<(usize, usize), GeometryError> {
    let base = shape.triangle_count();
    let vertices = grid_vertex_count(level).and_then(|n| n.checked_mul(base));
    let triangles = grid_triangle_count(level).and_then(|n| n.checked_mul(base));
    match (vertices, triangles) {
        (Some(v), Some(t)) if v <= u32::MAX as usize && t <= u32::MAX as usize => Ok((v, t)),
        _ => Err(GeometryError::SubdivisionTooDense { shape, level }),
    }
}

/// Subdivides `shape` into `level²` triangles per face and projects every
/// vertex onto the sphere of `radius`.
///
/// Normals are the normalized positions; colours start white.
///
/// # Errors
/// `level` must be at least 1, `radius` finite and positive, and both counts
/// must fit 32-bit indices.
pub fn subdivide(shape: BaseShape, level: u32, radius: f32) -> Result<Mesh, GeometryError> {
    if level == 0 {
        return Err(GeometryError::InvalidSubdivision(level));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(GeometryError::InvalidRadius(radius));
    }

    let (vertex_count, triangle_count) = subdivided_counts(shape, level)?;
    let grid_vertices = vertex_count / shape.triangle_count();
    let grid_triangles = triangle_count / shape.triangle_count();

    let mut positions = vec![Vec3::ZERO; vertex_count];
    let mut triangles = vec![[0u32; 3]; triangle_count];

    // Each base triangle writes only its own chunk of both arrays.
    positions
        .par_chunks_mut(grid_vertices)
        .zip(triangles.par_chunks_mut(grid_triangles))
        .enumerate()
        .for_each(|(base, (grid, grid_tris))| {
            let corners = shape.triangle_corners(base).map(|c| c * radius);
            let offset = (base * grid_vertices) as u32;
            fill_grid(corners, level, offset, grid, grid_tris);
        });

    positions
        .par_iter_mut()
        .for_each(|p| *p = p.normalize() * radius);
    let normals: Vec<Vec3> = positions.par_iter().map(|p| p.normalize()).collect();

    debug!(
        shape = %shape,
        level,
        vertices = vertex_count,
        triangles = triangle_count,
        "subdivided base shape"
    );

    Ok(Mesh {
        colors: vec![Color::WHITE; positions.len()],
        positions,
        normals,
        triangles,
    })
}

/// Fills one base triangle's grid of points and triangles.
///
/// `offset` is the global index of the grid's first vertex.
fn fill_grid(
    [v0, v1, v2]: [Vec3; 3],
    level: u32,
    offset: u32,
    grid: &mut [Vec3],
    triangles: &mut [[u32; 3]],
) {
    grid[0] = v0;

    for row in 0..level as usize {
        let row_start = row * (row + 1) / 2;
        let next_start = (row + 1) * (row + 2) / 2;
        let tri_start = row * row;

        let t = (row + 1) as f32 / level as f32;
        let left = v0.lerp(v1, t);
        let right = v0.lerp(v2, t);
        let span = (row + 1) as f32;
        for j in 0..=row + 1 {
            grid[next_start + j] = left.lerp(right, j as f32 / span);
        }

        let current = |j: usize| offset + (row_start + j) as u32;
        let next = |j: usize| offset + (next_start + j) as u32;

        for j in 0..=row {
            triangles[tri_start + 2 * j] = [current(j), next(j), next(j + 1)];
        }
        for j in 0..row {
            triangles[tri_start + 2 * j + 1] = [current(j + 1), current(j), next(j + 1)];
        }
    }
}
