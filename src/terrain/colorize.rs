//! Per-vertex colouring from height plus a noise jitter.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorGradient};
use crate::geometry::Mesh;
use crate::noise::NoiseField;

/// Colours vertices by their (noise-perturbed) distance from the centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceColorizer {
    /// Amplitude of the colour noise added to the height.
    pub color_strength: f32,
    /// Displacement strength the mesh was built with; sets the top of the
    /// normalization range `1 + height_strength`.
    pub height_strength: f32,
}

impl Default for SurfaceColorizer {
    fn default() -> Self {
        Self {
            color_strength: 0.1,
            height_strength: 0.1,
        }
    }
}

impl SurfaceColorizer {
    pub fn new(color_strength: f32, height_strength: f32) -> Self {
        Self {
            color_strength,
            height_strength,
        }
    }

    /// Gradient parameter for a vertex at distance `height` with noise `noise_value`.
    #[inline]
    pub fn gradient_position(&self, height: f32, noise_value: f32) -> f32 {
        let h = height + (noise_value - 0.5) * self.color_strength;
        (h / (1.0 + self.height_strength)).clamp(0.0, 1.0)
    }

    /// Computes one colour per vertex.
    pub fn colors<N: NoiseField + ?Sized>(
        &self,
        mesh: &Mesh,
        noise: &N,
        gradient: &ColorGradient,
    ) -> Vec<Color> {
        mesh.positions
            .par_iter()
            .map(|&p| gradient.evaluate(self.gradient_position(p.length(), noise.sample(p))))
            .collect()
    }

    /// Writes the colours into `mesh.colors`.
    pub fn colorize<N: NoiseField + ?Sized>(
        &self,
        mesh: &mut Mesh,
        noise: &N,
        gradient: &ColorGradient,
    ) {
        mesh.colors = self.colors(mesh, noise, gradient);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{GradientMode, GradientStop};
    use crate::geometry::{subdivide, BaseShape};
    use crate::noise::ConstantNoise;

    fn grey_ramp() -> ColorGradient {
        ColorGradient::new(
            vec![
                GradientStop::new(0.0, Color::BLACK),
                GradientStop::new(1.0, Color::WHITE),
            ],
            GradientMode::Blend,
        )
        .unwrap()
    }

    #[test]
    fn test_gradient_position_formula() {
        let c = SurfaceColorizer::new(0.2, 0.1);
        // h = 1.0 + (0.5 - 0.5) * 0.2 = 1.0; t = 1.0 / 1.1
        assert!((c.gradient_position(1.0, 0.5) - 1.0 / 1.1).abs() < 1e-6);
        // Clamped at both ends.
        assert_eq!(c.gradient_position(5.0, 0.5), 1.0);
        assert_eq!(c.gradient_position(-1.0, 0.5), 0.0);
    }

    #[test]
    fn test_colorize_unit_sphere() {
        let mut mesh = subdivide(BaseShape::Octahedron, 2, 1.0).unwrap();
        SurfaceColorizer::new(0.0, 0.0).colorize(&mut mesh, &ConstantNoise(0.0), &grey_ramp());
        assert_eq!(mesh.colors.len(), mesh.vertex_count());
        for c in &mesh.colors {
            // Unit height maps to the top of the ramp.
            assert!((c.r - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_higher_vertices_are_brighter() {
        let mut mesh = subdivide(BaseShape::Tetrahedron, 1, 1.0).unwrap();
        mesh.positions[0] *= 0.5;
        SurfaceColorizer::new(0.0, 0.0).colorize(&mut mesh, &ConstantNoise(0.5), &grey_ramp());
        assert!(mesh.colors[0].r < mesh.colors[1].r);
        assert!((mesh.colors[0].r - 0.5).abs() < 1e-5);
    }
}
