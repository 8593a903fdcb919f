//! Multi-octave fractal noise over 3D positions.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

use super::NoiseField;

/// How octaves are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FractalType {
    /// A single octave at the base frequency.
    None,
    /// Fractal Brownian motion: summed octaves.
    Fbm,
    /// Ridged multifractal: each octave folded as `1 - 2|n|`.
    #[default]
    Ridged,
}

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    pub fractal: FractalType,
    /// Number of noise octaves (1-16).
    pub octaves: u8,
    /// Base frequency of the noise.
    pub frequency: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude decay per octave (typically 0.5).
    pub gain: f32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            fractal: FractalType::Ridged,
            octaves: 3,
            frequency: 1.5,
            lacunarity: 2.0,
            gain: 0.5,
        }
    }
}

impl FractalNoiseConfig {
    /// Rugged, mountainous preset.
    pub fn rugged() -> Self {
        Self {
            fractal: FractalType::Ridged,
            octaves: 6,
            frequency: 2.0,
            lacunarity: 2.1,
            gain: 0.55,
        }
    }

    /// Smooth rolling hills.
    pub fn smooth() -> Self {
        Self {
            fractal: FractalType::Fbm,
            octaves: 4,
            frequency: 1.0,
            lacunarity: 2.0,
            gain: 0.4,
        }
    }
}

/// Seeded fractal noise field.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalNoise {
    seed: i32,
    config: FractalNoiseConfig,
}

impl FractalNoise {
    pub fn new(seed: i32, config: FractalNoiseConfig) -> Self {
        Self { seed, config }
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn config(&self) -> &FractalNoiseConfig {
        &self.config
    }
}

impl NoiseField for FractalNoise {
    fn sample(&self, pos: Vec3) -> f32 {
        sample_fractal_noise(pos, self.seed, &self.config)
    }
}

/// Samples fractal noise at a 3D position.
///
/// Uses 4D simplex noise with the w dimension set to 0, which samples
/// seamlessly across a sphere without UV distortion.
///
/// # Returns
/// A value in approximately [-1, 1] (normalized by the amplitude sum).
pub fn sample_fractal_noise(pos: Vec3, seed: i32, config: &FractalNoiseConfig) -> f32 {
    let octaves = match config.fractal {
        FractalType::None => 1,
        FractalType::Fbm | FractalType::Ridged => config.octaves.max(1),
    };

    let mut total = 0.0f32;
    let mut amplitude = 1.0f32;
    let mut frequency = config.frequency;
    let mut max_amplitude = 0.0f32;

    for octave in 0..octaves {
        // Each octave gets a different seed offset for variation
        let octave_seed = seed.wrapping_add(octave as i32 * 31337);
        let p = pos * frequency;

        let value = NoiseBuilder::fbm_4d_offset(p.x, 1, p.y, 1, p.z, 1, 0.0, 1)
            .with_seed(octave_seed)
            .with_freq(1.0)
            .with_octaves(1)
            .generate()
            .0[0];

        let value = match config.fractal {
            FractalType::Ridged => 1.0 - value.abs() * 2.0,
            FractalType::None | FractalType::Fbm => value,
        };

        total += value * amplitude;
        max_amplitude += amplitude;
        amplitude *= config.gain;
        frequency *= config.lacunarity;
    }

    total / max_amplitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FractalNoiseConfig::default();
        assert_eq!(config.fractal, FractalType::Ridged);
        assert_eq!(config.octaves, 3);
        assert_eq!(config.lacunarity, 2.0);
        assert_eq!(config.gain, 0.5);
    }

    #[test]
    fn test_noise_reproducibility() {
        let noise = FractalNoise::new(12345, FractalNoiseConfig::default());
        let pos = Vec3::new(0.5, 0.3, 0.7);
        assert_eq!(noise.sample(pos), noise.sample(pos));
    }

    #[test]
    fn test_noise_range() {
        for fractal in [FractalType::None, FractalType::Fbm, FractalType::Ridged] {
            let config = FractalNoiseConfig {
                fractal,
                ..FractalNoiseConfig::rugged()
            };
            let test_positions = [
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
                Vec3::new(0.577, 0.577, 0.577),
                Vec3::new(-0.5, 0.5, 0.707),
            ];
            for pos in test_positions {
                let value = sample_fractal_noise(pos, 7, &config);
                assert!(
                    value.is_finite() && (-1.5..=1.5).contains(&value),
                    "{:?} noise {} at {:?} out of expected range",
                    fractal,
                    value,
                    pos
                );
            }
        }
    }

    #[test]
    fn test_different_seeds_produce_different_results() {
        let config = FractalNoiseConfig::smooth();
        let pos = Vec3::new(0.5, 0.3, 0.7);
        let a = sample_fractal_noise(pos, 1, &config);
        let b = sample_fractal_noise(pos, 2, &config);
        assert_ne!(a, b, "Different seeds should produce different results");
    }

    #[test]
    fn test_config_serde() {
        let config = FractalNoiseConfig::rugged();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"ridged\""));
        let back: FractalNoiseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
