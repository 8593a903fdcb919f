//! Procedural geodesic-sphere terrain generator.
//!
//! This crate subdivides a base polyhedron into a geodesic sphere, displaces
//! and colours it with fractal noise, indexes the result with loose octrees
//! and scatters objects over the surface by area-weighted sampling.

pub mod color;
pub mod config;
pub mod export;
pub mod geometry;
pub mod noise;
pub mod pipeline;
pub mod sampling;
pub mod spatial;
pub mod terrain;
pub mod world;

pub use color::{Color, ColorGradient};
pub use config::TerrainConfig;
pub use geometry::{subdivide, BaseShape, Mesh, MeshBuffers};
pub use noise::{FractalNoise, FractalNoiseConfig, NoiseField};
pub use pipeline::{generate, GenerationReport, GenerationStage, Pipeline, StageOutcome};
pub use sampling::{Placement, SurfaceScatterer, WeightedSurfaceSampler};
pub use terrain::{build_terrain, Terrain, TerrainData};
pub use world::{MeshSink, World, WorldStore};
