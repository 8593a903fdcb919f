//! Saving and loading world configurations.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::TerrainConfig;

/// File extension of saved worlds.
pub const WORLD_EXTENSION: &str = "json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed world file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("World file {path} holds seed {found}, expected {expected}")]
    SeedMismatch {
        path: PathBuf,
        expected: u64,
        found: u64,
    },
}

/// Directory of saved worlds, one JSON file per seed:
/// `<root>/<world_dir>/<seed>.json`.
///
/// Only the configuration is stored. Generation is deterministic, so the
/// terrain is rebuilt from it on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldStore {
    root: PathBuf,
    world_dir: String,
}

impl WorldStore {
    pub fn new(root: impl Into<PathBuf>, world_dir: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            world_dir: world_dir.into(),
        }
    }

    pub fn directory(&self) -> PathBuf {
        self.root.join(&self.world_dir)
    }

    pub fn path_for(&self, seed: u64) -> PathBuf {
        self.directory().join(format!("{}.{}", seed, WORLD_EXTENSION))
    }

    pub fn exists(&self, seed: u64) -> bool {
        self.path_for(seed).is_file()
    }

    /// Writes `config` under its seed, creating the directory as needed.
    pub fn save(&self, config: &TerrainConfig) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(self.directory())?;
        let path = self.path_for(config.seed);

        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, config).map_err(|source| StorageError::Json {
            path: path.clone(),
            source,
        })?;
        writer.flush()?;

        tracing::info!(path = %path.display(), seed = config.seed, "Saved world");
        Ok(path)
    }

    pub fn load(&self, seed: u64) -> Result<TerrainConfig, StorageError> {
        let path = self.path_for(seed);
        let config = read_config(&path)?;
        if config.seed != seed {
            return Err(StorageError::SeedMismatch {
                path,
                expected: seed,
                found: config.seed,
            });
        }
        Ok(config)
    }

    /// Seeds of every saved world, sorted. A missing directory has none.
    pub fn saved_seeds(&self) -> Result<Vec<u64>, StorageError> {
        let dir = self.directory();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut seeds: Vec<u64> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == WORLD_EXTENSION))
            .filter_map(|path| path.file_stem()?.to_str()?.parse().ok())
            .collect();
        seeds.sort_unstable();
        Ok(seeds)
    }
}

/// Reads a configuration from any JSON file.
pub fn read_config(path: &Path) -> Result<TerrainConfig, StorageError> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_path_layout() {
        let store = WorldStore::new("/data", "worlds");
        assert_eq!(store.path_for(1234), PathBuf::from("/data/worlds/1234.json"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = WorldStore::new(dir.path(), "worlds");
        let config = TerrainConfig::rugged(77);

        let path = store.save(&config).unwrap();
        assert!(path.is_file());
        assert!(store.exists(77));
        assert_eq!(store.load(77).unwrap(), config);
    }

    #[test]
    fn test_missing_world() {
        let dir = tempdir().unwrap();
        let store = WorldStore::new(dir.path(), "worlds");
        assert!(matches!(store.load(5), Err(StorageError::Io(_))));
        assert!(store.saved_seeds().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_and_mismatched_files() {
        let dir = tempdir().unwrap();
        let store = WorldStore::new(dir.path(), "w");
        fs::create_dir_all(store.directory()).unwrap();

        fs::write(store.path_for(1), "{ not json").unwrap();
        assert!(matches!(store.load(1), Err(StorageError::Json { .. })));

        fs::write(store.path_for(2), r#"{ "seed": 3 }"#).unwrap();
        assert!(matches!(
            store.load(2),
            Err(StorageError::SeedMismatch { expected: 2, found: 3, .. })
        ));
    }

    #[test]
    fn test_saved_seeds() {
        let dir = tempdir().unwrap();
        let store = WorldStore::new(dir.path(), "worlds");
        for seed in [30, 4, 1000] {
            store.save(&TerrainConfig::with_seed(seed)).unwrap();
        }
        fs::write(store.directory().join("notes.txt"), "ignored").unwrap();
        assert_eq!(store.saved_seeds().unwrap(), vec![4, 30, 1000]);
    }
}
