//! The standard terrain generation stages.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{GenerationStage, PipelineError, StageId, StageOutcome};
use crate::config::TerrainConfig;
use crate::geometry::subdivide;
use crate::sampling::SurfaceScatterer;
use crate::terrain::build_terrain;
use crate::world::World;

const NO_MESH: &str = "no mesh to work on";

fn skip(reason: impl ToString) -> Result<StageOutcome, PipelineError> {
    Ok(StageOutcome::Skipped(reason.to_string()))
}

/// Subdivides the configured base shape onto the sphere.
pub struct StructureStage;

impl GenerationStage for StructureStage {
    fn id(&self) -> StageId {
        StageId::Structure
    }

    fn name(&self) -> &str {
        "Sphere Structure"
    }

    fn execute(&self, world: &mut World, config: &TerrainConfig) -> Result<StageOutcome, PipelineError> {
        if let Err(e) = config.validate_structure() {
            return skip(e);
        }
        let s = &config.structure;
        let mesh = match subdivide(s.shape, s.subdivision, s.radius) {
            Ok(mesh) => mesh,
            Err(e) => return skip(e),
        };
        tracing::debug!(
            shape = %s.shape,
            level = s.subdivision,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "Subdivided base shape"
        );
        world.mesh = Some(mesh);
        Ok(StageOutcome::Completed)
    }
}

/// Displaces vertices with the height noise, then optionally recomputes
/// normals.
pub struct DisplacementStage;

impl GenerationStage for DisplacementStage {
    fn id(&self) -> StageId {
        StageId::Displacement
    }

    fn name(&self) -> &str {
        "Height Displacement"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Structure]
    }

    fn execute(&self, world: &mut World, config: &TerrainConfig) -> Result<StageOutcome, PipelineError> {
        let Some(mesh) = world.mesh.as_mut() else {
            return skip(NO_MESH);
        };
        if let Err(e) = config.validate_displacement() {
            return skip(e);
        }

        config.displacer().displace(mesh, &config.height_noise());
        if config.displacement.recompute_normals {
            mesh.recompute_normals();
        }
        Ok(StageOutcome::Completed)
    }
}

/// Colours vertices by height through the configured gradient.
///
/// Without a gradient the stage is skipped and vertices keep their default
/// white.
pub struct ColorizationStage;

impl GenerationStage for ColorizationStage {
    fn id(&self) -> StageId {
        StageId::Colorization
    }

    fn name(&self) -> &str {
        "Surface Colouring"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Structure]
    }

    fn execute(&self, world: &mut World, config: &TerrainConfig) -> Result<StageOutcome, PipelineError> {
        let Some(mesh) = world.mesh.as_mut() else {
            return skip(NO_MESH);
        };
        if let Err(e) = config.validate_color() {
            return skip(e);
        }
        let Some(gradient) = config.color.gradient.as_ref() else {
            return skip("no colour gradient configured");
        };
        config
            .colorizer()
            .colorize(mesh, &config.color_noise(), gradient);
        Ok(StageOutcome::Completed)
    }
}

/// Freezes the mesh into terrain data and builds the spatial indexes.
pub struct TerrainDataStage;

impl GenerationStage for TerrainDataStage {
    fn id(&self) -> StageId {
        StageId::TerrainData
    }

    fn name(&self) -> &str {
        "Terrain Data"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Structure]
    }

    fn execute(&self, world: &mut World, config: &TerrainConfig) -> Result<StageOutcome, PipelineError> {
        let Some(mesh) = world.mesh.as_ref() else {
            return skip(NO_MESH);
        };
        if let Err(e) = config.validate_index() {
            return skip(e);
        }
        let terrain = build_terrain(mesh, &config.index)?;
        tracing::debug!(
            surface_area = terrain.areas().total(),
            depth = terrain.triangle_index().max_depth(),
            "Terrain indexes ready"
        );
        world.terrain = Some(terrain);
        Ok(StageOutcome::Completed)
    }
}

/// Scatters objects over the terrain with an RNG seeded from the config.
pub struct ScatterStage;

impl GenerationStage for ScatterStage {
    fn id(&self) -> StageId {
        StageId::Scatter
    }

    fn name(&self) -> &str {
        "Surface Scatter"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::TerrainData]
    }

    fn execute(&self, world: &mut World, config: &TerrainConfig) -> Result<StageOutcome, PipelineError> {
        let Some(terrain) = world.terrain.as_ref() else {
            return skip("no terrain data");
        };
        if let Err(e) = config.validate_scatter() {
            return skip(e);
        }
        let sampler = terrain.sampler()?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        SurfaceScatterer::new(config.scatter.up).scatter(
            &sampler,
            config.scatter.count,
            &mut rng,
            &mut world.placements,
        );
        tracing::debug!(placed = world.placements.len(), "Scattered surface objects");
        Ok(StageOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::config::MAX_SUBDIVISION;
    use crate::pipeline::{generate, Pipeline};

    #[test]
    fn test_full_generation() {
        let config = TerrainConfig::preview(42);
        let (world, report) = generate(&config).unwrap();

        assert!(report.is_complete(), "{:?}", report);
        assert_eq!(report.stages.len(), 5);
        let mesh = world.mesh.as_ref().unwrap();
        let terrain = world.terrain.as_ref().unwrap();
        assert_eq!(mesh.triangle_count(), 20 * 8 * 8);
        assert_eq!(terrain.data().triangles().len(), mesh.triangle_count());
        assert_eq!(world.placements.len(), config.scatter.count);
        assert_eq!(world.config, config);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = TerrainConfig::preview(7);
        let (a, _) = generate(&config).unwrap();
        let (b, _) = generate(&config).unwrap();
        assert_eq!(a.mesh, b.mesh);
        assert_eq!(a.placements, b.placements);
    }

    #[test]
    fn test_invalid_structure_skips_everything() {
        let mut config = TerrainConfig::preview(1);
        config.structure.subdivision = 0;
        let (world, report) = generate(&config).unwrap();

        assert_eq!(report.skipped().count(), 5);
        assert!(world.mesh.is_none());
        assert!(world.terrain.is_none());
        assert!(world.placements.is_empty());
    }

    #[test]
    fn test_level_over_limit_skips_everything() {
        let mut config = TerrainConfig::preview(1);
        config.structure.subdivision = MAX_SUBDIVISION + 1;
        let (world, report) = generate(&config).unwrap();

        assert!(matches!(
            report.outcome(StageId::Structure),
            Some(StageOutcome::Skipped(reason)) if reason.contains("512")
        ));
        assert_eq!(report.skipped().count(), 5);
        assert!(world.mesh.is_none());
    }

    #[test]
    fn test_invalid_noise_skips_shaping_stages() {
        let mut config = TerrainConfig::preview(4);
        config.noise.frequency = f32::NAN;
        let (world, report) = generate(&config).unwrap();

        assert_eq!(
            report.skipped().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![StageId::Displacement, StageId::Colorization]
        );
        // The undisplaced sphere is still indexed and scattered over.
        let mesh = world.mesh.as_ref().unwrap();
        assert!(mesh.positions.iter().all(|p| (p.length() - 1.0).abs() < 1e-5));
        assert!(world.terrain.is_some());
        assert_eq!(world.placements.len(), config.scatter.count);
    }

    #[test]
    fn test_invalid_index_skips_terrain_data() {
        let mut config = TerrainConfig::preview(6);
        config.index.vertices.min_node_size = 0.0;
        let (world, report) = generate(&config).unwrap();

        assert_eq!(
            report.skipped().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![StageId::TerrainData, StageId::Scatter]
        );
        assert!(world.mesh.is_some());
        assert!(world.terrain.is_none());
    }

    #[test]
    fn test_missing_gradient_keeps_white_vertices() {
        let mut config = TerrainConfig::preview(3);
        config.color.gradient = None;
        let (world, report) = generate(&config).unwrap();

        assert_eq!(
            report.skipped().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![StageId::Colorization]
        );
        assert!(world.mesh.unwrap().colors.iter().all(|&c| c == Color::WHITE));
        assert!(world.terrain.is_some());
        assert!(!world.placements.is_empty());
    }

    #[test]
    fn test_degenerate_surface_fails_scatter() {
        let config = TerrainConfig::preview(5);
        let mut world = crate::world::World::new(config.clone());
        let mut pipeline = Pipeline::new(config);
        pipeline.add_stage(StructureStage);
        pipeline.run(&mut world).unwrap();

        // Collapse every vertex onto the origin: the surface has no area.
        let mesh = world.mesh.as_mut().unwrap();
        for p in &mut mesh.positions {
            *p = glam::Vec3::ZERO;
        }
        TerrainDataStage.execute(&mut world, &TerrainConfig::preview(5)).unwrap();
        let result = ScatterStage.execute(&mut world, &TerrainConfig::preview(5));
        assert!(matches!(result, Err(PipelineError::Sampling(_))));
    }

    #[test]
    fn test_normals_follow_flag() {
        let mut config = TerrainConfig::preview(9);
        config.displacement.recompute_normals = false;
        let (world, _) = generate(&config).unwrap();
        let mesh = world.mesh.unwrap();
        let undisplaced = subdivide(
            config.structure.shape,
            config.structure.subdivision,
            config.structure.radius,
        )
        .unwrap();
        assert_eq!(mesh.normals, undisplaced.normals);
    }
}
