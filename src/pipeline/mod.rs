//! Pipeline module for orchestrating terrain generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that can be composed into the full terrain pipeline:
//! structure, displacement, colouring, terrain data, scatter.

mod stage;
mod stages;

pub use stage::{
    GenerationReport, GenerationStage, Pipeline, PipelineError, StageId, StageOutcome, StageReport,
};
pub use stages::{
    ColorizationStage, DisplacementStage, ScatterStage, StructureStage, TerrainDataStage,
};

use crate::config::TerrainConfig;
use crate::world::World;

impl Pipeline {
    /// The five standard stages in order.
    pub fn standard(config: TerrainConfig) -> Self {
        let mut pipeline = Pipeline::new(config);
        pipeline
            .add_stage(StructureStage)
            .add_stage(DisplacementStage)
            .add_stage(ColorizationStage)
            .add_stage(TerrainDataStage)
            .add_stage(ScatterStage);
        pipeline
    }
}

/// Runs the standard pipeline into a fresh world.
pub fn generate(config: &TerrainConfig) -> Result<(World, GenerationReport), PipelineError> {
    let mut world = World::new(config.clone());
    let report = Pipeline::standard(config.clone()).run(&mut world)?;
    Ok((world, report))
}
