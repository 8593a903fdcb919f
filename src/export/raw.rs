//! RAW buffer export for engine import.
//!
//! Each mesh attribute goes to its own headerless little-endian file, in
//! the same layout as [`MeshBuffers`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::ExportError;
use crate::geometry::MeshBuffers;

/// Files written by [`export_mesh_raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFiles {
    /// `f32 x 3` per vertex.
    pub positions: PathBuf,
    /// `f32 x 3` per vertex.
    pub normals: PathBuf,
    /// `f32 x 4` (RGBA) per vertex.
    pub colors: PathBuf,
    /// `u32 x 3` per triangle.
    pub indices: PathBuf,
}

/// Writes `<name>_positions.raw`, `<name>_normals.raw`, `<name>_colors.raw`
/// and `<name>_indices.raw` into `dir`.
pub fn export_mesh_raw(buffers: &MeshBuffers, dir: &Path, name: &str) -> Result<RawFiles, ExportError> {
    let file = |attr: &str| dir.join(format!("{}_{}.raw", name, attr));
    let files = RawFiles {
        positions: file("positions"),
        normals: file("normals"),
        colors: file("colors"),
        indices: file("indices"),
    };

    write_words(&files.positions, bytemuck::cast_slice::<[f32; 3], f32>(&buffers.positions))?;
    write_words(&files.normals, bytemuck::cast_slice::<[f32; 3], f32>(&buffers.normals))?;
    write_words(&files.colors, bytemuck::cast_slice::<[f32; 4], f32>(&buffers.colors))?;
    write_words(&files.indices, &buffers.indices)?;

    tracing::debug!(dir = %dir.display(), name, "Wrote raw buffers");
    Ok(files)
}

/// 32-bit values that can be written little-endian.
trait LeWord: Copy {
    fn le_bytes(self) -> [u8; 4];
}

impl LeWord for f32 {
    fn le_bytes(self) -> [u8; 4] {
        self.to_le_bytes()
    }
}

impl LeWord for u32 {
    fn le_bytes(self) -> [u8; 4] {
        self.to_le_bytes()
    }
}

fn write_words<W: LeWord>(path: &Path, words: &[W]) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for &w in words {
        writer.write_all(&w.le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
