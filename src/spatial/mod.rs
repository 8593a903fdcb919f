//! Spatial indexes over terrain triangles and vertices.
//!
//! Both indexes are loose octrees: triangles are keyed by their bounding
//! boxes, vertices by their positions.

mod bound;
mod octree;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use bound::Bound;
pub use octree::{BoundsOctree, LooseOctree, PointOctree, MAX_GROW_ATTEMPTS};

/// Errors raised while building a spatial index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    #[error("Invalid octree configuration: {0}")]
    InvalidConfig(String),
    #[error("Object bound is not finite: {0}")]
    NonFiniteBound(String),
    #[error("Object centered at {center:?} is still outside the octree after {attempts} growth steps")]
    OutOfReach { center: Vec3, attempts: usize },
}

/// Shape and split policy of an octree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OctreeConfig {
    /// Edge length of the root cube.
    pub initial_size: f32,
    /// Centre of the root cube.
    pub center: Vec3,
    /// Nodes whose children would be smaller than this never split.
    pub min_node_size: f32,
    /// Loose-bounds multiplier, between 1 and 2.
    pub looseness: f32,
    /// Objects a leaf holds before it splits.
    pub max_objects_per_node: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            initial_size: 2.0,
            center: Vec3::ZERO,
            min_node_size: 1e-5,
            looseness: 1.0,
            max_objects_per_node: 8,
        }
    }
}

impl OctreeConfig {
    /// Triangle index preset: loose nodes so boxes straddling split planes
    /// still sink.
    pub fn triangles() -> Self {
        Self {
            looseness: 1.2,
            ..Self::default()
        }
    }

    /// Vertex index preset.
    pub fn vertices() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), SpatialError> {
        if !(self.initial_size.is_finite() && self.initial_size > 0.0) {
            return Err(SpatialError::InvalidConfig(format!(
                "initial_size must be positive, got {}",
                self.initial_size
            )));
        }
        if !(self.min_node_size > 0.0 && self.min_node_size <= self.initial_size) {
            return Err(SpatialError::InvalidConfig(format!(
                "min_node_size must be in (0, {}], got {}",
                self.initial_size, self.min_node_size
            )));
        }
        if !(1.0..=2.0).contains(&self.looseness) {
            return Err(SpatialError::InvalidConfig(format!(
                "looseness must be in [1, 2], got {}",
                self.looseness
            )));
        }
        if self.max_objects_per_node == 0 {
            return Err(SpatialError::InvalidConfig(
                "max_objects_per_node must be at least 1".to_string(),
            ));
        }
        if !self.center.is_finite() {
            return Err(SpatialError::InvalidConfig("center must be finite".to_string()));
        }
        Ok(())
    }
}
