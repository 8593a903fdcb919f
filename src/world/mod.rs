//! A generated world and its persistence.
//!
//! A [`World`] holds everything one generation pass produces. Saving stores
//! only the [`TerrainConfig`]; loading regenerates and hands the rebuilt
//! buffers to a [`MeshSink`].

mod storage;

use thiserror::Error;

pub use storage::{read_config, StorageError, WorldStore, WORLD_EXTENSION};

use crate::config::TerrainConfig;
use crate::geometry::{Mesh, MeshBuffers};
use crate::pipeline::{GenerationReport, Pipeline, PipelineError};
use crate::sampling::Placement;
use crate::terrain::Terrain;

#[derive(Error, Debug)]
pub enum WorldError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Generation produced no terrain: {0}")]
    Incomplete(String),
}

/// Receives rebuilt mesh buffers, typically a renderer.
pub trait MeshSink {
    fn rebuild(&mut self, buffers: &MeshBuffers);
}

impl<F: FnMut(&MeshBuffers)> MeshSink for F {
    fn rebuild(&mut self, buffers: &MeshBuffers) {
        self(buffers)
    }
}

/// State of one generated terrain.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub config: TerrainConfig,
    /// Working mesh; present once the structure stage has run.
    pub mesh: Option<Mesh>,
    pub terrain: Option<Terrain>,
    pub placements: Vec<Placement>,
}

impl World {
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Drops all generated state and adopts `config`.
    pub fn reset(&mut self, config: TerrainConfig) {
        self.config = config;
        self.mesh = None;
        self.terrain = None;
        self.placements.clear();
    }

    /// Regenerates this world from its current configuration.
    pub fn regenerate(&mut self) -> Result<GenerationReport, PipelineError> {
        Pipeline::standard(self.config.clone()).run(self)
    }

    /// Renderer buffers derived from the terrain data, if built.
    pub fn buffers(&self) -> Option<MeshBuffers> {
        self.terrain.as_ref().map(|t| t.data().to_buffers())
    }

    pub fn save(&self, store: &WorldStore) -> Result<std::path::PathBuf, StorageError> {
        store.save(&self.config)
    }

    /// Loads the world saved under `seed`, regenerates it and passes the
    /// rebuilt buffers to `sink`.
    pub fn load_and_rebuild<S: MeshSink + ?Sized>(
        store: &WorldStore,
        seed: u64,
        sink: &mut S,
    ) -> Result<(World, GenerationReport), WorldError> {
        let config = store.load(seed)?;
        let mut world = World::new(config);
        let report = world.regenerate()?;

        let buffers = world.buffers().ok_or_else(|| {
            let reason = report
                .skipped()
                .map(|(id, reason)| format!("{}: {}", id.name(), reason))
                .collect::<Vec<_>>()
                .join("; ");
            WorldError::Incomplete(reason)
        })?;
        sink.rebuild(&buffers);
        tracing::info!(seed, vertices = buffers.positions.len(), "Rebuilt world");
        Ok((world, report))
    }
}
