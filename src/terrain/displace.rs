//! Radial height displacement of mesh vertices.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geometry::Mesh;
use crate::noise::NoiseField;

/// Pushes each vertex along its radial direction by a noise-driven amount.
///
/// `new = normalize(p) * (1 + (noise(p) - 0.5) * strength)`, so the result
/// is centered on the unit sphere whatever radius the mesh was built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightDisplacer {
    pub strength: f32,
}

impl Default for HeightDisplacer {
    fn default() -> Self {
        Self { strength: 0.1 }
    }
}

impl HeightDisplacer {
    pub fn new(strength: f32) -> Self {
        Self { strength }
    }

    /// Radius a vertex ends up at for a given noise sample.
    #[inline]
    pub fn displaced_radius(&self, noise_value: f32) -> f32 {
        1.0 + (noise_value - 0.5) * self.strength
    }

    /// Displaces every vertex of `mesh` in place. Normals are left untouched.
    pub fn displace<N: NoiseField + ?Sized>(&self, mesh: &mut Mesh, noise: &N) {
        mesh.positions.par_iter_mut().for_each(|p| {
            let original = *p;
            *p = original.normalize_or_zero() * self.displaced_radius(noise.sample(original));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{subdivide, BaseShape};
    use crate::noise::{ConstantNoise, FractalNoise, FractalNoiseConfig};
    use glam::Vec3;

    #[test]
    fn test_zero_strength_is_identity_on_unit_sphere() {
        let original = subdivide(BaseShape::Icosahedron, 4, 1.0).unwrap();
        let mut mesh = original.clone();
        let noise = FractalNoise::new(3, FractalNoiseConfig::default());

        HeightDisplacer::new(0.0).displace(&mut mesh, &noise);

        for (a, b) in original.positions.iter().zip(&mesh.positions) {
            assert!((*a - *b).length() < 1e-6, "{:?} moved to {:?}", a, b);
        }
        assert_eq!(original.normals, mesh.normals);
        assert_eq!(original.triangles, mesh.triangles);
    }

    #[test]
    fn test_constant_noise_scales_uniformly() {
        let mut mesh = subdivide(BaseShape::Octahedron, 3, 1.0).unwrap();
        // noise 1.0 -> radius 1 + 0.5 * 0.2 = 1.1
        HeightDisplacer::new(0.2).displace(&mut mesh, &ConstantNoise(1.0));
        for p in &mesh.positions {
            assert!((p.length() - 1.1).abs() < 1e-5);
        }
    }

    #[test]
    fn test_direction_preserved() {
        let original = subdivide(BaseShape::Tetrahedron, 3, 2.0).unwrap();
        let mut mesh = original.clone();
        let noise = FractalNoise::new(11, FractalNoiseConfig::rugged());
        HeightDisplacer::new(0.3).displace(&mut mesh, &noise);
        for (a, b) in original.positions.iter().zip(&mesh.positions) {
            assert!((a.normalize() - b.normalize()).length() < 1e-5);
        }
    }

    #[test]
    fn test_noise_sampled_at_original_position() {
        struct XNoise;
        impl NoiseField for XNoise {
            fn sample(&self, pos: Vec3) -> f32 {
                pos.x
            }
        }
        let mut mesh = Mesh {
            positions: vec![Vec3::new(3.0, 0.0, 0.0)],
            normals: vec![Vec3::X],
            colors: vec![Default::default()],
            triangles: vec![],
        };
        // noise 3.0 -> radius 1 + 2.5 * 0.1 = 1.25
        HeightDisplacer::new(0.1).displace(&mut mesh, &XNoise);
        assert!((mesh.positions[0] - Vec3::new(1.25, 0.0, 0.0)).length() < 1e-6);
    }
}
