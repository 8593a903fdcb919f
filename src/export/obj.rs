//! Wavefront OBJ export with per-vertex colours.
//!
//! Colours use the widely supported `v x y z r g b` extension.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ExportError;
use crate::geometry::MeshBuffers;

/// Writes the mesh as OBJ to any writer.
pub fn write_obj<W: Write>(buffers: &MeshBuffers, writer: &mut W) -> Result<(), ExportError> {
    if buffers.indices.len() % 3 != 0 {
        return Err(ExportError::InvalidMesh(format!(
            "index count {} is not a multiple of 3",
            buffers.indices.len()
        )));
    }
    let vertex_count = buffers.positions.len();
    if buffers.normals.len() != vertex_count || buffers.colors.len() != vertex_count {
        return Err(ExportError::InvalidMesh(
            "vertex attribute lengths differ".to_string(),
        ));
    }

    writeln!(writer, "# geoterrain")?;
    writeln!(
        writer,
        "# {} vertices, {} triangles",
        vertex_count,
        buffers.indices.len() / 3
    )?;
    for (p, c) in buffers.positions.iter().zip(&buffers.colors) {
        writeln!(
            writer,
            "v {} {} {} {} {} {}",
            p[0], p[1], p[2], c[0], c[1], c[2]
        )?;
    }
    for n in &buffers.normals {
        writeln!(writer, "vn {} {} {}", n[0], n[1], n[2])?;
    }
    for tri in buffers.indices.chunks_exact(3) {
        // OBJ indices are 1-based.
        let (a, b, c) = (tri[0] as u64 + 1, tri[1] as u64 + 1, tri[2] as u64 + 1);
        writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    Ok(())
}

/// Writes the mesh as an OBJ file.
pub fn export_obj(buffers: &MeshBuffers, path: &Path) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_obj(buffers, &mut writer)?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), "Wrote OBJ");
    Ok(())
}
