//! Noise fields that drive height displacement and colour variation.
//!
//! Uses simdnoise for the underlying simplex noise.

mod fractal;

pub use fractal::{sample_fractal_noise, FractalNoise, FractalNoiseConfig, FractalType};

use glam::Vec3;

/// A pure scalar field over 3D space.
///
/// Implementations must be deterministic: the same position always yields
/// the same value.
pub trait NoiseField: Send + Sync {
    fn sample(&self, pos: Vec3) -> f32;
}

/// A field with the same value everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNoise(pub f32);

impl NoiseField for ConstantNoise {
    fn sample(&self, _pos: Vec3) -> f32 {
        self.0
    }
}
