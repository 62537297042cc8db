//! CLI command implementations.

pub mod describe;
pub mod solve;
pub mod walk;

use anyhow::{Context, Result};
use lockstep_types::MapDocument;
use std::path::Path;

/// Read and parse a map file.
pub fn load_map(path: &Path) -> Result<MapDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read map file {}", path.display()))?;
    MapDocument::parse(&text).with_context(|| format!("Invalid map file {}", path.display()))
}
