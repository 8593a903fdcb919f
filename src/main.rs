//! Geoterrain CLI - Procedural geodesic-sphere terrain generator.
//!
//! Generate displaced, coloured geodesic spheres with scattered surface
//! objects, save them as seeds, and reload them.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use geoterrain::config::TerrainConfig;
use geoterrain::export::{export_mesh_raw, export_obj, export_placements_json};
use geoterrain::geometry::{subdivided_counts, BaseShape, MeshBuffers};
use geoterrain::noise::FractalType;
use geoterrain::pipeline::{Pipeline, StageOutcome};
use geoterrain::terrain::{TerrainTriangle, TerrainVertex};
use geoterrain::world::{read_config, World, WorldStore};
use tracing_subscriber::EnvFilter;

/// Procedural geodesic-sphere terrain generator.
#[derive(Parser)]
#[command(name = "geoterrain")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new terrain.
    Generate {
        #[command(flatten)]
        params: GenerateParams,

        #[command(flatten)]
        output: OutputParams,

        /// Save the configuration to the world store after generating.
        #[arg(long)]
        save: bool,

        #[command(flatten)]
        store: StoreParams,
    },

    /// Regenerate a saved world from its seed.
    Load {
        /// Seed of the saved world.
        #[arg(short, long)]
        seed: u64,

        #[command(flatten)]
        output: OutputParams,

        #[command(flatten)]
        store: StoreParams,
    },

    /// Display information about a shape and subdivision level.
    Info {
        /// Base polyhedron.
        #[arg(long, default_value = "icosahedron")]
        shape: ShapeArg,

        /// Segments per base-triangle edge.
        #[arg(short = 'l', long, default_value = "32")]
        subdivision: u32,
    },
}

#[derive(Args)]
struct GenerateParams {
    /// Random seed for reproducible generation.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Start from a configuration file instead of a preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting preset.
    #[arg(long, default_value = "default")]
    preset: PresetArg,

    /// Base polyhedron.
    #[arg(long)]
    shape: Option<ShapeArg>,

    /// Segments per base-triangle edge (1 keeps the base shape).
    #[arg(short = 'l', long)]
    subdivision: Option<u32>,

    /// Sphere radius before displacement.
    #[arg(long)]
    radius: Option<f32>,

    /// How noise octaves are combined.
    #[arg(long)]
    fractal: Option<FractalArg>,

    /// Number of noise octaves (1-16).
    #[arg(long)]
    octaves: Option<u8>,

    /// Base noise frequency.
    #[arg(long)]
    frequency: Option<f32>,

    /// Frequency multiplier per octave.
    #[arg(long)]
    lacunarity: Option<f32>,

    /// Amplitude decay per octave.
    #[arg(long)]
    gain: Option<f32>,

    /// Height displacement strength.
    #[arg(long)]
    strength: Option<f32>,

    /// Colour noise strength.
    #[arg(long)]
    color_strength: Option<f32>,

    /// Skip colouring; vertices stay white.
    #[arg(long)]
    no_color: bool,

    /// Keep sphere normals instead of recomputing them after displacement.
    #[arg(long)]
    sphere_normals: bool,

    /// Number of objects to scatter.
    #[arg(long)]
    scatter: Option<usize>,
}

#[derive(Args)]
struct OutputParams {
    /// Output directory for exported files.
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Base name for output files.
    #[arg(short, long, default_value = "terrain")]
    name: String,

    /// Export format.
    #[arg(short, long, default_value = "obj")]
    format: ExportFormat,
}

#[derive(Args)]
struct StoreParams {
    /// Root directory of the world store.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// World directory under the root.
    #[arg(long, default_value = "worlds")]
    world_dir: String,
}

impl StoreParams {
    fn store(&self) -> WorldStore {
        WorldStore::new(&self.root, &self.world_dir)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// Wavefront OBJ with vertex colours.
    Obj,
    /// Little-endian RAW buffers, one file per attribute.
    Raw,
    /// Both OBJ and RAW.
    All,
    /// Nothing but the placements file.
    None,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Default,
    Preview,
    Rugged,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Tetrahedron,
    Hexahedron,
    Octahedron,
    Icosahedron,
}

impl From<ShapeArg> for BaseShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Tetrahedron => BaseShape::Tetrahedron,
            ShapeArg::Hexahedron => BaseShape::Hexahedron,
            ShapeArg::Octahedron => BaseShape::Octahedron,
            ShapeArg::Icosahedron => BaseShape::Icosahedron,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FractalArg {
    None,
    Fbm,
    Ridged,
}

impl From<FractalArg> for FractalType {
    fn from(arg: FractalArg) -> Self {
        match arg {
            FractalArg::None => FractalType::None,
            FractalArg::Fbm => FractalType::Fbm,
            FractalArg::Ridged => FractalType::Ridged,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            params,
            output,
            save,
            store,
        } => {
            run_generate(params, output, save, store);
        }
        Commands::Load {
            seed,
            output,
            store,
        } => {
            run_load(seed, output, store);
        }
        Commands::Info { shape, subdivision } => {
            run_info(shape.into(), subdivision);
        }
    }
}

fn build_config(params: GenerateParams) -> TerrainConfig {
    // Generate seed if not provided
    let seed = params.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });

    let mut config = match &params.config {
        Some(path) => read_config(path).unwrap_or_else(|e| {
            eprintln!("Error reading config {}: {}", path.display(), e);
            std::process::exit(1);
        }),
        None => match params.preset {
            PresetArg::Default => TerrainConfig::default(),
            PresetArg::Preview => TerrainConfig::preview(seed),
            PresetArg::Rugged => TerrainConfig::rugged(seed),
        },
    };
    if params.config.is_none() || params.seed.is_some() {
        config.seed = seed;
    }

    if let Some(shape) = params.shape {
        config.structure.shape = shape.into();
    }
    if let Some(level) = params.subdivision {
        config.structure.subdivision = level;
    }
    if let Some(radius) = params.radius {
        config.structure.radius = radius;
    }
    if let Some(fractal) = params.fractal {
        config.noise.fractal = fractal.into();
    }
    if let Some(octaves) = params.octaves {
        config.noise.octaves = octaves;
    }
    if let Some(frequency) = params.frequency {
        config.noise.frequency = frequency;
    }
    if let Some(lacunarity) = params.lacunarity {
        config.noise.lacunarity = lacunarity;
    }
    if let Some(gain) = params.gain {
        config.noise.gain = gain;
    }
    if let Some(strength) = params.strength {
        config.displacement.strength = strength;
    }
    if let Some(strength) = params.color_strength {
        config.color.noise_strength = strength;
    }
    if params.no_color {
        config.color.gradient = None;
    }
    if params.sphere_normals {
        config.displacement.recompute_normals = false;
    }
    if let Some(count) = params.scatter {
        config.scatter.count = count;
    }
    config
}

fn run_generate(params: GenerateParams, output: OutputParams, save: bool, store: StoreParams) {
    let config = build_config(params);

    // Validate parameters
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let (vertices, triangles) = config.mesh_counts().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    println!("Geoterrain - Geodesic Terrain Generator");
    println!("=======================================");
    println!(
        "Shape: {} (level {})",
        config.structure.shape, config.structure.subdivision
    );
    println!("Mesh: {} vertices, {} triangles", vertices, triangles);
    println!("Seed: {}", config.seed);
    println!("Output: {}", output.output.display());

    let start = Instant::now();
    println!("\nRunning generation pipeline...");
    let pipeline = Pipeline::standard(config.clone());
    let mut world = World::new(config);
    let report = pipeline
        .run_with_callbacks(
            &mut world,
            |name, i, total| {
                println!("  [{}/{}] {}...", i + 1, total, name);
            },
            |name, outcome, _, _| {
                if let StageOutcome::Skipped(reason) = outcome {
                    println!("  {}: SKIPPED ({})", name, reason);
                }
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });
    println!("Generation completed in {:.2?}", report.total_elapsed());

    export_world(&world, &output);

    if save {
        match world.save(&store.store()) {
            Ok(path) => println!("Saved world to {}", path.display()),
            Err(e) => {
                eprintln!("Error saving world: {}", e);
                std::process::exit(1);
            }
        }
    }

    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn run_load(seed: u64, output: OutputParams, store: StoreParams) {
    let store = store.store();
    println!("Geoterrain - Load World");
    println!("=======================");
    println!("World: {}", store.path_for(seed).display());

    let start = Instant::now();
    let mut rebuild = |buffers: &MeshBuffers| {
        println!(
            "Mesh rebuilt: {} vertices, {} triangles",
            buffers.positions.len(),
            buffers.indices.len() / 3
        );
    };
    let (world, _) = World::load_and_rebuild(&store, seed, &mut rebuild).unwrap_or_else(|e| {
        eprintln!("Error loading world {}: {}", seed, e);
        std::process::exit(1);
    });

    export_world(&world, &output);
    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn export_world(world: &World, output: &OutputParams) {
    let Some(buffers) = world.buffers() else {
        println!("No terrain data; nothing to export");
        return;
    };

    if let Err(e) = std::fs::create_dir_all(&output.output) {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    }

    println!("\nExporting...");
    let export_start = Instant::now();
    let dir = output.output.as_path();
    let name = output.name.as_str();

    if matches!(output.format, ExportFormat::Obj | ExportFormat::All) {
        let path = dir.join(format!("{}.obj", name));
        export_obj(&buffers, &path).unwrap_or_else(|e| fail_export("OBJ", e));
        println!("  Exported {}", path.display());
    }
    if matches!(output.format, ExportFormat::Raw | ExportFormat::All) {
        let files = export_mesh_raw(&buffers, dir, name).unwrap_or_else(|e| fail_export("RAW", e));
        println!("  Exported {} (+ normals, colors, indices)", files.positions.display());
    }

    let placements = dir.join(format!("{}_placements.json", name));
    export_placements_json(&world.placements, world.config.seed, &placements)
        .unwrap_or_else(|e| fail_export("placements", e));
    println!(
        "  Exported {} ({} objects)",
        placements.display(),
        world.placements.len()
    );
    println!("Export completed in {:.2?}", export_start.elapsed());
}

fn fail_export(what: &str, e: impl std::fmt::Display) -> ! {
    eprintln!("Error exporting {}: {}", what, e);
    std::process::exit(1);
}

fn run_info(shape: BaseShape, level: u32) {
    if level == 0 {
        eprintln!("Error: Subdivision level must be at least 1");
        std::process::exit(1);
    }
    let (vertices, triangles) = subdivided_counts(shape, level).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let (v, t) = (vertices as u64, triangles as u64);

    let bytes_mesh = v * (12 + 12 + 16) + t * 12;
    let bytes_terrain = v * std::mem::size_of::<TerrainVertex>() as u64
        + t * std::mem::size_of::<TerrainTriangle>() as u64
        + t * 4; // cumulative areas
    let bytes_raw = v * (12 + 12 + 16) + t * 12;

    println!("Geoterrain - Mesh Configuration Info");
    println!("====================================");
    println!();
    println!("Shape: {} ({} base triangles)", shape, shape.triangle_count());
    println!("Subdivision level: {}", level);
    println!();
    println!("Counts:");
    println!("  Vertices:  {:>12}", vertices);
    println!("  Triangles: {:>12}", triangles);
    println!();
    println!("Memory usage (in-memory, excluding octree nodes):");
    println!("  Mesh:         {:>12} bytes ({:.2} MB)", bytes_mesh, mb(bytes_mesh));
    println!("  Terrain data: {:>12} bytes ({:.2} MB)", bytes_terrain, mb(bytes_terrain));
    println!();
    println!("Export file sizes:");
    println!("  RAW buffers:  {:>12} bytes ({:.2} MB) - 4 files", bytes_raw, mb(bytes_raw));
    println!();
    if vertices > u16::MAX as usize {
        println!("Index format: 32-bit required ({} vertices > 65535)", vertices);
    } else {
        println!("Index format: 16-bit sufficient");
    }
    println!("Edge vertices are duplicated per base triangle.");
}

fn mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
