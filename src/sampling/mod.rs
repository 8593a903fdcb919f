//! Area-weighted surface sampling and object scattering.

mod area_table;
mod sampler;
mod scatter;

use thiserror::Error;

pub use area_table::CumulativeAreaTable;
pub use sampler::{point_in_triangle, SurfaceSample, WeightedSurfaceSampler};
pub use scatter::{Placement, SurfaceScatterer};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SamplingError {
    #[error("Cannot sample a surface with no triangles")]
    EmptySurface,
    #[error("Total surface area must be finite and positive, got {0}")]
    DegenerateArea(f32),
    #[error("Area table has {table} entries for {triangles} triangles")]
    TableMismatch { table: usize, triangles: usize },
}
