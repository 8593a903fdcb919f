//! Generation configuration.
//!
//! Everything needed to reproduce a terrain bit-for-bit lives here; this is
//! also what gets persisted when a world is saved.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::ColorGradient;
use crate::geometry::{subdivided_counts, BaseShape, GeometryError};
use crate::noise::{FractalNoise, FractalNoiseConfig};
use crate::spatial::SpatialError;
use crate::terrain::{HeightDisplacer, IndexConfig, SurfaceColorizer};

/// Largest subdivision level accepted by [`TerrainConfig::validate`].
pub const MAX_SUBDIVISION: u32 = 512;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Subdivision level must be in 1..={max}, got {level}")]
    Subdivision { level: u32, max: u32 },
    #[error("Radius must be finite and positive, got {0}")]
    Radius(f32),
    #[error("Noise octaves must be in 1..=16, got {0}")]
    Octaves(u8),
    #[error("Noise parameter `{name}` must be finite and positive, got {value}")]
    Noise { name: &'static str, value: f32 },
    #[error("Strength `{name}` must be finite, got {value}")]
    Strength { name: &'static str, value: f32 },
    #[error("Scatter up axis must be non-zero and finite")]
    UpAxis,
    #[error("Index configuration: {0}")]
    Index(#[from] SpatialError),
}

/// Base shape and resolution of the sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureConfig {
    pub shape: BaseShape,
    /// Segments per base-triangle edge. 1 reproduces the base shape.
    pub subdivision: u32,
    pub radius: f32,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            shape: BaseShape::Icosahedron,
            subdivision: 32,
            radius: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplacementConfig {
    /// Height noise amplitude. 0 leaves the unit sphere untouched.
    pub strength: f32,
    /// Recompute area-weighted normals after displacement. On by default,
    /// unlike the classic pipeline which kept the undisplaced sphere normals;
    /// turn it off to reproduce that behaviour.
    pub recompute_normals: bool,
}

impl Default for DisplacementConfig {
    fn default() -> Self {
        Self {
            strength: 0.1,
            recompute_normals: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Amplitude of the colour noise added to vertex height.
    pub noise_strength: f32,
    /// Height-to-colour mapping. Without one, colouring is skipped and
    /// vertices stay white.
    pub gradient: Option<ColorGradient>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            noise_strength: 0.1,
            gradient: Some(ColorGradient::terrain()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    /// Objects placed per generation pass.
    pub count: usize,
    /// Canonical up axis of the placed objects.
    pub up: Vec3,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            count: 200,
            up: Vec3::Y,
        }
    }
}

/// Full configuration of one terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u64,
    pub structure: StructureConfig,
    pub noise: FractalNoiseConfig,
    pub displacement: DisplacementConfig,
    pub color: ColorConfig,
    pub scatter: ScatterConfig,
    pub index: IndexConfig,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            structure: StructureConfig::default(),
            noise: FractalNoiseConfig::default(),
            displacement: DisplacementConfig::default(),
            color: ColorConfig::default(),
            scatter: ScatterConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl TerrainConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Small, fast preset for previews and tests.
    pub fn preview(seed: u64) -> Self {
        Self {
            seed,
            structure: StructureConfig {
                subdivision: 8,
                ..StructureConfig::default()
            },
            scatter: ScatterConfig {
                count: 50,
                ..ScatterConfig::default()
            },
            ..Self::default()
        }
    }

    /// Dense, rugged planet.
    pub fn rugged(seed: u64) -> Self {
        Self {
            seed,
            structure: StructureConfig {
                subdivision: 96,
                ..StructureConfig::default()
            },
            noise: FractalNoiseConfig::rugged(),
            displacement: DisplacementConfig {
                strength: 0.25,
                ..DisplacementConfig::default()
            },
            scatter: ScatterConfig {
                count: 1000,
                ..ScatterConfig::default()
            },
            ..Self::default()
        }
    }

    /// Noise seed for heights. Seeds are truncated to the noise backend's
    /// 32-bit range.
    pub fn height_seed(&self) -> i32 {
        self.seed as i32
    }

    /// Noise seed for colours, one past the height seed.
    pub fn color_seed(&self) -> i32 {
        self.height_seed().wrapping_add(1)
    }

    pub fn height_noise(&self) -> FractalNoise {
        FractalNoise::new(self.height_seed(), self.noise.clone())
    }

    pub fn color_noise(&self) -> FractalNoise {
        FractalNoise::new(self.color_seed(), self.noise.clone())
    }

    pub fn displacer(&self) -> HeightDisplacer {
        HeightDisplacer::new(self.displacement.strength)
    }

    pub fn colorizer(&self) -> SurfaceColorizer {
        SurfaceColorizer::new(self.color.noise_strength, self.displacement.strength)
    }

    /// Vertex and triangle counts the structure produces.
    pub fn mesh_counts(&self) -> Result<(usize, usize), GeometryError> {
        subdivided_counts(self.structure.shape, self.structure.subdivision)
    }

    /// Checks every section.
    ///
    /// A missing gradient is not an error here; the colouring stage reports it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_structure()?;
        self.validate_displacement()?;
        self.validate_color()?;
        self.validate_scatter()?;
        self.validate_index()
    }

    /// Subdivision level and radius.
    pub fn validate_structure(&self) -> Result<(), ConfigError> {
        let level = self.structure.subdivision;
        if level == 0 || level > MAX_SUBDIVISION {
            return Err(ConfigError::Subdivision {
                level,
                max: MAX_SUBDIVISION,
            });
        }
        let radius = self.structure.radius;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(ConfigError::Radius(radius));
        }
        Ok(())
    }

    /// Fractal parameters shared by the height and colour noise.
    pub fn validate_noise(&self) -> Result<(), ConfigError> {
        if !(1..=16).contains(&self.noise.octaves) {
            return Err(ConfigError::Octaves(self.noise.octaves));
        }
        for (name, value) in [
            ("frequency", self.noise.frequency),
            ("lacunarity", self.noise.lacunarity),
            ("gain", self.noise.gain),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Noise { name, value });
            }
        }
        Ok(())
    }

    /// Everything the displacement stage reads.
    pub fn validate_displacement(&self) -> Result<(), ConfigError> {
        self.validate_noise()?;
        finite_strength("displacement", self.displacement.strength)
    }

    /// Everything the colouring stage reads. Colour heights are scaled by the
    /// displacement strength as well.
    pub fn validate_color(&self) -> Result<(), ConfigError> {
        self.validate_noise()?;
        finite_strength("displacement", self.displacement.strength)?;
        finite_strength("color", self.color.noise_strength)
    }

    pub fn validate_scatter(&self) -> Result<(), ConfigError> {
        if !(self.scatter.up.is_finite() && self.scatter.up.length_squared() > 0.0) {
            return Err(ConfigError::UpAxis);
        }
        Ok(())
    }

    pub fn validate_index(&self) -> Result<(), ConfigError> {
        self.index.triangles.validate()?;
        self.index.vertices.validate()?;
        Ok(())
    }
}

fn finite_strength(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Strength { name, value })
    }
}
