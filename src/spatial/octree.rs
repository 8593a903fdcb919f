//! Loose octree keyed by a [`Bound`].
//!
//! Every node owns a cube of edge `base_length`; its loose bounds are that
//! cube scaled by `looseness`, so objects straddling a split plane can still
//! sink into a child. Children are indexed by octant bits: bit 0 set for
//! `+X`, bit 1 for `+Y`, bit 2 for `+Z` relative to the node centre.

use glam::Vec3;

use super::{Bound, OctreeConfig, SpatialError};
use crate::geometry::{Aabb, Ray};

/// How many times the root may double while trying to enclose one object.
pub const MAX_GROW_ATTEMPTS: usize = 20;

#[derive(Debug, Clone, Copy)]
struct NodeParams {
    looseness: f32,
    min_node_size: f32,
    max_objects: usize,
}

#[derive(Debug, Clone)]
struct Entry<T, B> {
    item: T,
    bound: B,
}

#[derive(Debug, Clone)]
struct Node<T, B> {
    center: Vec3,
    base_length: f32,
    bounds: Aabb,
    objects: Vec<Entry<T, B>>,
    /// Empty, or exactly eight children in octant order.
    children: Vec<Node<T, B>>,
}

impl<T: Copy, B: Bound> Node<T, B> {
    fn new(center: Vec3, base_length: f32, looseness: f32) -> Self {
        Self {
            center,
            base_length,
            bounds: Aabb::from_center_size(center, base_length * looseness),
            objects: Vec::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    fn octant_of(&self, point: Vec3) -> usize {
        (point.x >= self.center.x) as usize
            | ((point.y >= self.center.y) as usize) << 1
            | ((point.z >= self.center.z) as usize) << 2
    }

    fn child_center(&self, octant: usize) -> Vec3 {
        let quarter = self.base_length / 4.0;
        let offset = |bit: usize| if octant & bit != 0 { quarter } else { -quarter };
        self.center + Vec3::new(offset(1), offset(2), offset(4))
    }

    fn insert(&mut self, entry: Entry<T, B>, params: &NodeParams) {
        if self.children.is_empty() {
            if self.objects.len() < params.max_objects
                || self.base_length / 2.0 < params.min_node_size
            {
                self.objects.push(entry);
                return;
            }
            self.split(params);
        }

        let octant = self.octant_of(entry.bound.center());
        if entry.bound.fits_in(&self.children[octant].bounds) {
            self.children[octant].insert(entry, params);
        } else {
            self.objects.push(entry);
        }
    }

    fn split(&mut self, params: &NodeParams) {
        let half = self.base_length / 2.0;
        self.children = (0..8)
            .map(|octant| Node::new(self.child_center(octant), half, params.looseness))
            .collect();

        for entry in std::mem::take(&mut self.objects) {
            let octant = self.octant_of(entry.bound.center());
            if entry.bound.fits_in(&self.children[octant].bounds) {
                self.children[octant].insert(entry, params);
            } else {
                self.objects.push(entry);
            }
        }
    }

    fn has_objects(&self) -> bool {
        !self.objects.is_empty() || self.children.iter().any(Node::has_objects)
    }

    fn collect_ray(&self, ray: &Ray, tolerance: f32, out: &mut Vec<T>) {
        if self.bounds.inflate(tolerance).intersect_ray(ray).is_none() {
            return;
        }
        out.extend(
            self.objects
                .iter()
                .filter(|e| e.bound.hit_by_ray(ray, tolerance))
                .map(|e| e.item),
        );
        for child in &self.children {
            child.collect_ray(ray, tolerance, out);
        }
    }

    fn collect_region(&self, region: &Aabb, out: &mut Vec<T>) {
        if !self.bounds.overlaps(region) {
            return;
        }
        out.extend(
            self.objects
                .iter()
                .filter(|e| e.bound.overlaps(region))
                .map(|e| e.item),
        );
        for child in &self.children {
            child.collect_region(region, out);
        }
    }

    fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    fn depth(&self) -> usize {
        1 + self.children.iter().map(Node::depth).max().unwrap_or(0)
    }
}

/// A loose octree storing copies of `T` keyed by bounds of type `B`.
///
/// Queries take `&self` and never mutate, so a built tree can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct LooseOctree<T, B> {
    root: Node<T, B>,
    params: NodeParams,
    len: usize,
}

/// Octree over boxes. Used for triangles.
pub type BoundsOctree<T> = LooseOctree<T, Aabb>;

/// Octree over points. Used for vertices.
pub type PointOctree<T> = LooseOctree<T, Vec3>;

impl<T: Copy, B: Bound> LooseOctree<T, B> {
    pub fn new(config: &OctreeConfig) -> Result<Self, SpatialError> {
        config.validate()?;
        let params = NodeParams {
            looseness: config.looseness,
            min_node_size: config.min_node_size,
            max_objects: config.max_objects_per_node,
        };
        Ok(Self {
            root: Node::new(config.center, config.initial_size, config.looseness),
            params,
            len: 0,
        })
    }

    /// Builds a tree and inserts every item in iteration order.
    pub fn build<I>(config: &OctreeConfig, items: I) -> Result<Self, SpatialError>
    where
        I: IntoIterator<Item = (T, B)>,
    {
        let mut tree = Self::new(config)?;
        for (item, bound) in items {
            tree.insert(item, bound)?;
        }
        Ok(tree)
    }

    /// Adds an object. The root grows toward objects that fall outside it.
    pub fn insert(&mut self, item: T, bound: B) -> Result<(), SpatialError> {
        if !bound.is_finite() {
            return Err(SpatialError::NonFiniteBound(format!("{:?}", bound)));
        }

        let mut attempts = 0;
        while !bound.fits_in(&self.root.bounds) {
            if attempts == MAX_GROW_ATTEMPTS {
                return Err(SpatialError::OutOfReach {
                    center: bound.center(),
                    attempts,
                });
            }
            self.grow(bound.center() - self.root.center);
            attempts += 1;
        }
        if attempts > 0 {
            tracing::debug!(
                attempts,
                edge = self.root.base_length,
                "Grew octree root"
            );
        }

        self.root.insert(Entry { item, bound }, &self.params);
        self.len += 1;
        Ok(())
    }

    /// Doubles the root toward `direction`, keeping the old root as one of
    /// the new root's children.
    fn grow(&mut self, direction: Vec3) {
        let step = |v: f32| if v >= 0.0 { 1.0 } else { -1.0 };
        let dir = Vec3::new(step(direction.x), step(direction.y), step(direction.z));
        let old_length = self.root.base_length;
        let new_center = self.root.center + dir * (old_length / 2.0);
        let looseness = self.params.looseness;

        let old_root = std::mem::replace(
            &mut self.root,
            Node::new(new_center, old_length * 2.0, looseness),
        );
        if old_root.has_objects() {
            let slot = self.root.octant_of(old_root.center);
            let mut children: Vec<Node<T, B>> = (0..8)
                .map(|octant| Node::new(self.root.child_center(octant), old_length, looseness))
                .collect();
            children[slot] = old_root;
            self.root.children = children;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Loose bounds of the root node.
    pub fn bounds(&self) -> Aabb {
        self.root.bounds
    }

    /// Every object whose bound the ray passes within `tolerance` of.
    pub fn query_ray(&self, ray: &Ray, tolerance: f32) -> Vec<T> {
        let mut out = Vec::new();
        self.root.collect_ray(ray, tolerance, &mut out);
        out
    }

    /// Every object whose bound touches `region`.
    pub fn query_region(&self, region: &Aabb) -> Vec<T> {
        let mut out = Vec::new();
        self.root.collect_region(region, &mut out);
        out
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    pub fn max_depth(&self) -> usize {
        self.root.depth()
    }
}

impl<T: Copy> LooseOctree<T, Aabb> {
    /// Objects whose boxes the ray intersects.
    pub fn colliding(&self, ray: &Ray) -> Vec<T> {
        self.query_ray(ray, 0.0)
    }
}

impl<T: Copy> LooseOctree<T, Vec3> {
    /// Points within `max_distance` of the ray.
    pub fn nearby(&self, ray: &Ray, max_distance: f32) -> Vec<T> {
        self.query_ray(ray, max_distance)
    }
}
