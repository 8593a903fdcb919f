//! Area-weighted uniform sampling of a triangulated surface.

use glam::Vec3;
use rand::Rng;

use super::{CumulativeAreaTable, SamplingError};
use crate::terrain::{TerrainData, TriangleId};

/// A point drawn from the surface, with the triangle it lies on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub triangle: TriangleId,
    pub position: Vec3,
}

/// Maps two uniforms in `[0, 1)` to a uniform point on triangle `abc`.
///
/// Pairs with `u + v > 1` fall in the far half of the unit square and are
/// reflected back into the unit triangle.
#[inline]
pub fn point_in_triangle(a: Vec3, b: Vec3, c: Vec3, u: f32, v: f32) -> Vec3 {
    let (u, v) = if u + v > 1.0 { (1.0 - u, 1.0 - v) } else { (u, v) };
    a + (b - a) * u + (c - a) * v
}

/// Picks triangles with probability proportional to area, then a uniform
/// point inside the chosen triangle.
#[derive(Debug, Clone, Copy)]
pub struct WeightedSurfaceSampler<'a> {
    data: &'a TerrainData,
    areas: &'a CumulativeAreaTable,
}

impl<'a> WeightedSurfaceSampler<'a> {
    pub fn new(data: &'a TerrainData, areas: &'a CumulativeAreaTable) -> Result<Self, SamplingError> {
        if areas.is_empty() {
            return Err(SamplingError::EmptySurface);
        }
        if areas.len() != data.triangles().len() {
            return Err(SamplingError::TableMismatch {
                table: areas.len(),
                triangles: data.triangles().len(),
            });
        }
        let total = areas.total();
        if !(total.is_finite() && total > 0.0) {
            return Err(SamplingError::DegenerateArea(total));
        }
        Ok(Self { data, areas })
    }

    pub fn total_area(&self) -> f32 {
        self.areas.total()
    }

    /// Triangle selected by a draw `r` in `[0, total)`.
    pub fn pick_triangle(&self, r: f32) -> TriangleId {
        // The constructor rejects empty tables, so a bound always exists.
        TriangleId(self.areas.lower_bound(r).unwrap_or(0) as u32)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SurfaceSample {
        let r = rng.random_range(0.0..self.areas.total());
        let triangle = self.pick_triangle(r);
        let position = self.data.triangles()[triangle.index()].random_point(self.data.vertices(), rng);
        SurfaceSample { triangle, position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{subdivide, BaseShape, Mesh};
    use crate::terrain::{build_terrain, IndexConfig, Terrain};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn terrain_for(mesh: &Mesh) -> Terrain {
        build_terrain(mesh, &IndexConfig::default()).unwrap()
    }

    fn frequencies(terrain: &Terrain, draws: usize, seed: u64) -> Vec<usize> {
        let sampler = terrain.sampler().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut counts = vec![0usize; terrain.data().triangles().len()];
        for _ in 0..draws {
            counts[sampler.sample(&mut rng).triangle.index()] += 1;
        }
        counts
    }

    /// Pearson chi-squared statistic against area-proportional expectations.
    fn chi_squared(terrain: &Terrain, counts: &[usize], draws: usize) -> f64 {
        let total = terrain.areas().total() as f64;
        terrain
            .data()
            .triangles()
            .iter()
            .zip(counts)
            .map(|(t, &observed)| {
                let expected = draws as f64 * t.area as f64 / total;
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum()
    }

    #[test]
    fn test_hexahedron_uniform_over_triangles() {
        let terrain = terrain_for(&subdivide(BaseShape::Hexahedron, 1, 1.0).unwrap());
        assert_eq!(terrain.data().triangles().len(), 12);

        let draws = 120_000;
        let counts = frequencies(&terrain, draws, 1234);
        // 11 degrees of freedom: p = 0.001 critical value is 31.26.
        let chi2 = chi_squared(&terrain, &counts, draws);
        assert!(chi2 < 31.26, "chi-squared {} too large for {:?}", chi2, counts);
        for &c in &counts {
            assert!((c as f64 / draws as f64 - 1.0 / 12.0).abs() < 0.005);
        }
    }

    #[test]
    fn test_frequencies_follow_area() {
        // Uneven areas: scale one hemisphere so triangles differ.
        let mut mesh = subdivide(BaseShape::Octahedron, 3, 1.0).unwrap();
        for p in &mut mesh.positions {
            if p.x > 0.0 {
                p.x *= 2.5;
            }
        }
        let terrain = terrain_for(&mesh);
        let n = terrain.data().triangles().len();
        let draws = 400_000;
        let counts = frequencies(&terrain, draws, 99);
        let chi2 = chi_squared(&terrain, &counts, draws);
        // Generous bound: mean of chi-squared is the degrees of freedom.
        let dof = (n - 1) as f64;
        assert!(chi2 < dof + 6.0 * (2.0 * dof).sqrt(), "chi-squared {} with {} dof", chi2, dof);
    }

    #[test]
    fn test_pick_triangle_boundaries() {
        let terrain = terrain_for(&subdivide(BaseShape::Tetrahedron, 1, 1.0).unwrap());
        let sampler = terrain.sampler().unwrap();
        let first = terrain.areas().sums()[0];
        assert_eq!(sampler.pick_triangle(0.0), TriangleId(0));
        assert_eq!(sampler.pick_triangle(first), TriangleId(0));
        assert_eq!(sampler.pick_triangle(first * 1.001), TriangleId(1));
        assert_eq!(sampler.pick_triangle(sampler.total_area()), TriangleId(3));
    }

    #[test]
    fn test_sample_lies_on_its_triangle() {
        let terrain = terrain_for(&subdivide(BaseShape::Icosahedron, 3, 2.0).unwrap());
        let sampler = terrain.sampler().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..200 {
            let s = sampler.sample(&mut rng);
            let t = terrain.data().triangle(s.triangle).unwrap();
            let grown = t.bounds.inflate(1e-5);
            assert!(grown.contains_point(s.position));
        }
    }

    #[test]
    fn test_point_in_triangle_fold() {
        let (a, b, c) = (Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(point_in_triangle(a, b, c, 0.25, 0.5), Vec3::new(0.25, 0.5, 0.0));
        // (0.75, 0.75) reflects to (0.25, 0.25).
        assert_eq!(point_in_triangle(a, b, c, 0.75, 0.75), Vec3::new(0.25, 0.25, 0.0));
    }

    #[test]
    fn test_rejects_empty_and_zero_area() {
        let data = TerrainData::default();
        let empty = CumulativeAreaTable::default();
        assert!(matches!(
            WeightedSurfaceSampler::new(&data, &empty),
            Err(SamplingError::EmptySurface)
        ));

        let mut mesh = subdivide(BaseShape::Tetrahedron, 1, 1.0).unwrap();
        for p in &mut mesh.positions {
            *p = Vec3::ZERO;
        }
        let terrain = terrain_for(&mesh);
        assert!(matches!(terrain.sampler(), Err(SamplingError::DegenerateArea(_))));
    }
}
