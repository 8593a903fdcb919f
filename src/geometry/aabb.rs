//! Axis-aligned boxes, rays and the intersection tests the spatial indexes use.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner (inclusive).
    pub min: Vec3,
    /// Maximum corner (inclusive).
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(
            min.cmple(max).all(),
            "AABB min must be <= max on all axes"
        );
        Self { min, max }
    }

    /// Create a cube centered on `center` with edge length `size`.
    pub fn from_center_size(center: Vec3, size: f32) -> Self {
        let half = Vec3::splat(size * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Component-wise min/max of a set of points.
    ///
    /// Returns `None` for an empty set.
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Bounds of a single triangle.
    pub fn from_triangle(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            min: a.min(b).min(c),
            max: a.max(b).max(c),
        }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Grows the box by `amount` on every side.
    pub fn inflate(&self, amount: f32) -> Self {
        let pad = Vec3::splat(amount);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Smallest box enclosing both.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True if `other` lies entirely inside this box (boundary included).
    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }

    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && self.max.cmpge(point).all()
    }

    /// Two boxes overlap if they share any interior or boundary points.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Slab test. Returns the entry distance along the ray, or `None` when
    /// the ray misses or the box is behind the origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let mut enter = 0.0f32;
        let mut exit = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if direction.abs() < f32::EPSILON {
                // Parallel to this slab: must already be between its planes.
                if origin < lo || origin > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let t1 = (lo - origin) * inv;
            let t2 = (hi - origin) * inv;
            enter = enter.max(t1.min(t2));
            exit = exit.min(t1.max(t2));
            if exit < enter {
                return None;
            }
        }

        Some(enter)
    }
}

/// Half-line from `origin` along the unit vector `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray; `direction` is normalized.
    ///
    /// Returns `None` for a zero or non-finite direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        direction.try_normalize().map(|direction| Self { origin, direction })
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Distance from `point` to the ray (clamped to the origin behind it).
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        let t = (point - self.origin).dot(self.direction).max(0.0);
        self.at(t).distance(point)
    }

    /// Möller–Trumbore ray/triangle test. Returns the hit distance.
    ///
    /// Both windings are reported; back faces are not culled.
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        const EPSILON: f32 = 1e-7;

        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_from_triangle_matches_from_points() {
        let (a, b, c) = (Vec3::X, Vec3::new(0.2, 0.9, -0.3), Vec3::new(-0.5, 0.1, 0.7));
        assert_eq!(
            Aabb::from_triangle(a, b, c),
            Aabb::from_points([a, b, c]).unwrap()
        );
    }

    #[test]
    fn test_contains_and_overlaps() {
        let outer = unit_box();
        let inner = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        let straddling = Aabb::new(Vec3::splat(0.5), Vec3::splat(1.5));
        let outside = Aabb::new(Vec3::splat(2.0), Vec3::splat(3.0));

        assert!(outer.contains(&inner));
        assert!(outer.contains(&outer));
        assert!(!outer.contains(&straddling));
        assert!(outer.overlaps(&straddling));
        assert!(!outer.overlaps(&outside));
        assert!(outer.contains_point(Vec3::ONE));
        assert!(!outer.contains_point(Vec3::splat(1.01)));
    }

    #[test]
    fn test_center_size_inflate() {
        let aabb = Aabb::from_center_size(Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert_eq!(aabb.center(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(aabb.size(), Vec3::splat(2.0));
        assert_eq!(aabb.inflate(0.5).size(), Vec3::splat(3.0));
    }

    #[test]
    fn test_ray_box_hit_and_miss() {
        let aabb = unit_box();
        let hit = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X).unwrap();
        assert!((aabb.intersect_ray(&hit).unwrap() - 4.0).abs() < 1e-6);

        let miss = Ray::new(Vec3::new(-5.0, 2.0, 0.0), Vec3::X).unwrap();
        assert!(aabb.intersect_ray(&miss).is_none());

        let behind = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::X).unwrap();
        assert!(aabb.intersect_ray(&behind).is_none());

        let inside = Ray::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(aabb.intersect_ray(&inside), Some(0.0));
    }

    #[test]
    fn test_ray_box_axis_parallel_on_face() {
        // Ray travelling in the plane of a face with zero y/z components.
        let aabb = unit_box();
        let ray = Ray::new(Vec3::new(-5.0, 1.0, 1.0), Vec3::X).unwrap();
        assert!(aabb.intersect_ray(&ray).is_some());
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_ray_triangle() {
        let (a, b, c) = (
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        );
        let ray = Ray::new(Vec3::new(0.2, 0.2, 0.0), Vec3::Z).unwrap();
        let t = ray.intersect_triangle(a, b, c).unwrap();
        assert!((t - 1.0).abs() < 1e-6);

        let miss = Ray::new(Vec3::new(0.8, 0.8, 0.0), Vec3::Z).unwrap();
        assert!(miss.intersect_triangle(a, b, c).is_none());

        let away = Ray::new(Vec3::new(0.2, 0.2, 0.0), -Vec3::Z).unwrap();
        assert!(away.intersect_triangle(a, b, c).is_none());
    }

    #[test]
    fn test_distance_to_point() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X).unwrap();
        assert!((ray.distance_to_point(Vec3::new(3.0, 2.0, 0.0)) - 2.0).abs() < 1e-6);
        // Behind the origin the distance is measured to the origin.
        assert!((ray.distance_to_point(Vec3::new(-3.0, 4.0, 0.0)) - 5.0).abs() < 1e-6);
    }
}
