//! Scatters discrete objects over the terrain surface.

use glam::{Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::WeightedSurfaceSampler;
use crate::terrain::TriangleId;

/// One scattered object: where it stands and how it is rotated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: Vec3,
    /// Rotates the scatterer's up axis onto the outward radial direction.
    pub orientation: Quat,
    pub triangle: TriangleId,
}

/// Places objects standing normal to a curved surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceScatterer {
    up: Vec3,
}

impl Default for SurfaceScatterer {
    fn default() -> Self {
        Self { up: Vec3::Y }
    }
}

impl SurfaceScatterer {
    /// Uses `up` as the canonical axis of the objects being placed.
    /// A zero axis falls back to `+Y`.
    pub fn new(up: Vec3) -> Self {
        Self {
            up: up.try_normalize().unwrap_or(Vec3::Y),
        }
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Rotation taking the up axis onto the radial direction at `position`.
    pub fn orientation_at(&self, position: Vec3) -> Quat {
        match position.try_normalize() {
            Some(radial) => Quat::from_rotation_arc(self.up, radial),
            None => Quat::IDENTITY,
        }
    }

    /// Replaces the contents of `placements` with `count` new objects.
    pub fn scatter<R: Rng + ?Sized>(
        &self,
        sampler: &WeightedSurfaceSampler<'_>,
        count: usize,
        rng: &mut R,
        placements: &mut Vec<Placement>,
    ) {
        placements.clear();
        placements.reserve(count);
        placements.extend((0..count).map(|_| {
            let sample = sampler.sample(rng);
            Placement {
                position: sample.position,
                orientation: self.orientation_at(sample.position),
                triangle: sample.triangle,
            }
        }));
    }
}
