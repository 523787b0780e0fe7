use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::error::AtlasError;
use crate::layer::PackedLayer;

/// One line per layer: `x y width height "name"`
pub fn format_map(layers: &[PackedLayer]) -> String {
    layers
        .iter()
        .map(|l| format!("{} {} {} {} \"{}\"\n", l.x, l.y, l.width, l.height, l.name))
        .collect()
}

/// Write the plain-text position map, replacing any previous file
pub fn write_map(layers: &[PackedLayer], path: &Path) -> Result<()> {
    fs::write(path, format_map(layers)).map_err(|e| AtlasError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
