//! Shapes an octree can key its objects by.

use glam::Vec3;

use crate::geometry::{Aabb, Ray};

/// The extent of an indexed object.
///
/// Implemented for boxes (triangles are indexed by their bounds) and for
/// points (vertices are indexed by position).
pub trait Bound: Copy + std::fmt::Debug + Send + Sync {
    /// Point used to pick the octant an object descends into.
    fn center(&self) -> Vec3;

    /// True if the object lies entirely inside `region`.
    fn fits_in(&self, region: &Aabb) -> bool;

    /// True if the object touches `region`.
    fn overlaps(&self, region: &Aabb) -> bool;

    /// True if the ray passes within `tolerance` of the object.
    fn hit_by_ray(&self, ray: &Ray, tolerance: f32) -> bool;

    fn is_finite(&self) -> bool;
}

impl Bound for Aabb {
    fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    fn center(&self) -> Vec3 {
        Aabb::center(self)
    }

    fn fits_in(&self, region: &Aabb) -> bool {
        region.contains(self)
    }

    fn overlaps(&self, region: &Aabb) -> bool {
        Aabb::overlaps(self, region)
    }

    fn hit_by_ray(&self, ray: &Ray, tolerance: f32) -> bool {
        self.inflate(tolerance).intersect_ray(ray).is_some()
    }
}

impl Bound for Vec3 {
    fn is_finite(&self) -> bool {
        Vec3::is_finite(*self)
    }

    fn center(&self) -> Vec3 {
        *self
    }

    fn fits_in(&self, region: &Aabb) -> bool {
        region.contains_point(*self)
    }

    fn overlaps(&self, region: &Aabb) -> bool {
        region.contains_point(*self)
    }

    fn hit_by_ray(&self, ray: &Ray, tolerance: f32) -> bool {
        ray.distance_to_point(*self) <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_bound() {
        let region = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let inner = Aabb::new(Vec3::splat(-0.1), Vec3::splat(0.1));
        let crossing = Aabb::new(Vec3::splat(0.9), Vec3::splat(1.1));
        assert!(inner.fits_in(&region));
        assert!(!crossing.fits_in(&region));
        assert!(Bound::overlaps(&crossing, &region));

        let ray = Ray::new(Vec3::new(0.0, 0.15, -5.0), Vec3::Z).unwrap();
        assert!(!inner.hit_by_ray(&ray, 0.0));
        assert!(inner.hit_by_ray(&ray, 0.1));
    }

    #[test]
    fn test_point_bound() {
        let region = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(Vec3::splat(0.5).fits_in(&region));
        assert!(Vec3::ONE.fits_in(&region));
        assert!(!Vec3::splat(1.5).fits_in(&region));

        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z).unwrap();
        assert!(Vec3::new(0.05, 0.0, 2.0).hit_by_ray(&ray, 0.1));
        assert!(!Vec3::new(0.5, 0.0, 2.0).hit_by_ray(&ray, 0.1));
    }
}
