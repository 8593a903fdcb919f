//! Generation stage trait and pipeline orchestration.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::config::TerrainConfig;
use crate::sampling::SamplingError;
use crate::terrain::TerrainError;
use crate::world::World;

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Base shape subdivision onto the sphere.
    Structure,
    /// Noise-driven height displacement.
    Displacement,
    /// Height-based vertex colouring.
    Colorization,
    /// Terrain data, area table and spatial indexes.
    TerrainData,
    /// Surface object placement.
    Scatter,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Structure => "structure",
            StageId::Displacement => "displacement",
            StageId::Colorization => "colorization",
            StageId::TerrainData => "terrain_data",
            StageId::Scatter => "scatter",
        }
    }
}

/// What a stage did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    /// The stage was a no-op because its inputs or configuration were
    /// missing or invalid.
    Skipped(String),
}

impl StageOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StageOutcome::Completed)
    }
}

/// Errors that can occur during pipeline execution.
///
/// Configuration problems do not end up here; they skip the stage instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("Terrain data build failed: {0}")]
    Terrain(#[from] TerrainError),
    #[error("Surface sampling failed: {0}")]
    Sampling(#[from] SamplingError),
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the world in some way, building upon previous
/// stages.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage, modifying the world in place.
    ///
    /// Returns `Ok(StageOutcome::Skipped)` when the stage cannot run because
    /// of configuration, and `Err` for data integrity failures.
    fn execute(&self, world: &mut World, config: &TerrainConfig) -> Result<StageOutcome, PipelineError>;
}

/// Outcome and timing of one stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub id: StageId,
    pub name: String,
    pub outcome: StageOutcome,
    pub elapsed: Duration,
}

/// Per-stage record of a generation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub stages: Vec<StageReport>,
}

impl GenerationReport {
    pub fn outcome(&self, id: StageId) -> Option<&StageOutcome> {
        self.stages.iter().find(|s| s.id == id).map(|s| &s.outcome)
    }

    /// Stages that were skipped, with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = (StageId, &str)> {
        self.stages.iter().filter_map(|s| match &s.outcome {
            StageOutcome::Skipped(reason) => Some((s.id, reason.as_str())),
            StageOutcome::Completed => None,
        })
    }

    /// True if every stage completed.
    pub fn is_complete(&self) -> bool {
        self.stages.iter().all(|s| s.outcome.is_completed())
    }

    pub fn total_elapsed(&self) -> Duration {
        self.stages.iter().map(|s| s.elapsed).sum()
    }
}

/// Orchestrates multiple generation stages into a complete pipeline.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: TerrainConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Executes all stages in order on the given world.
    ///
    /// The world's derived state is discarded first, so every run rebuilds
    /// from scratch.
    pub fn run(&self, world: &mut World) -> Result<GenerationReport, PipelineError> {
        self.run_with_callbacks(world, |_, _, _| {}, |_, _, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `world` - The world to generate
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called with the outcome when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        world: &mut World,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<GenerationReport, PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, &StageOutcome, usize, usize),
    {
        world.reset(self.config.clone());
        let total = self.stages.len();
        let mut report = GenerationReport::default();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);
            let started = Instant::now();

            // A skipped dependency skips this stage; an absent one is an error.
            let mut outcome = None;
            for dep in stage.dependencies() {
                match report.outcome(*dep) {
                    None => {
                        return Err(PipelineError::MissingDependency(
                            stage.name().to_string(),
                            dep.name().to_string(),
                        ))
                    }
                    Some(StageOutcome::Skipped(_)) => {
                        outcome = Some(StageOutcome::Skipped(format!(
                            "dependency '{}' was skipped",
                            dep.name()
                        )));
                        break;
                    }
                    Some(StageOutcome::Completed) => {}
                }
            }

            let outcome = match outcome {
                Some(skipped) => skipped,
                None => match stage.execute(world, &self.config) {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::error!(stage = stage.name(), error = %e, "Stage failed");
                        return Err(e);
                    }
                },
            };
            let elapsed = started.elapsed();

            match &outcome {
                StageOutcome::Completed => tracing::info!(
                    stage = stage.name(),
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    "Stage completed"
                ),
                StageOutcome::Skipped(reason) => {
                    tracing::warn!(stage = stage.name(), reason = %reason, "Stage skipped")
                }
            }

            on_stage_complete(stage.name(), &outcome, i, total);
            report.stages.push(StageReport {
                id: stage.id(),
                name: stage.name().to_string(),
                outcome,
                elapsed,
            });
        }

        Ok(report)
    }
}
