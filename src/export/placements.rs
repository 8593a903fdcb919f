//! Scatter placements as JSON for a host's instancing system.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::ExportError;
use crate::sampling::Placement;

#[derive(Serialize)]
struct PlacementFile<'a> {
    seed: u64,
    count: usize,
    placements: &'a [Placement],
}

/// Writes `{ seed, count, placements: [{ position, orientation, triangle }] }`.
///
/// Positions are `[x, y, z]`, orientations `[x, y, z, w]` quaternions.
pub fn export_placements_json(
    placements: &[Placement],
    seed: u64,
    path: &Path,
) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(
        &mut writer,
        &PlacementFile {
            seed,
            count: placements.len(),
            placements,
        },
    )?;
    writer.flush()?;
    Ok(())
}
