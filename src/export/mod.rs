//! Export module for handing generated terrain to other tools.
//!
//! Supports Wavefront OBJ with vertex colours for inspection, RAW buffers
//! for engine import, and placement JSON for instancing.

mod obj;
mod placements;
mod raw;

use thiserror::Error;

pub use obj::{export_obj, write_obj};
pub use placements::export_placements_json;
pub use raw::{export_mesh_raw, RawFiles};

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),
}
