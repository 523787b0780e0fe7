use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::atlas::Atlas;
use crate::error::AtlasError;
use crate::layer::PackedLayer;

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    image: String,
    size: Size,
    layers: Vec<JsonLayer>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct JsonLayer {
    name: String,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl From<&PackedLayer> for JsonLayer {
    fn from(layer: &PackedLayer) -> Self {
        Self {
            name: layer.name.clone(),
            x: layer.x,
            y: layer.y,
            w: layer.width,
            h: layer.height,
        }
    }
}

fn to_json(atlas: &Atlas, image_name: &str) -> Result<String> {
    let output = JsonOutput {
        meta: Meta {
            app: "skyatlas",
            version: env!("CARGO_PKG_VERSION"),
        },
        image: image_name.to_string(),
        size: Size {
            w: atlas.width,
            h: atlas.height,
        },
        layers: atlas.layers.iter().map(JsonLayer::from).collect(),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

/// Write the JSON position map. `image_name` is how the map refers to the atlas image.
pub fn write_json(atlas: &Atlas, image_name: &str, path: &Path) -> Result<()> {
    let content = to_json(atlas, image_name)?;

    fs::write(path, content).map_err(|e| AtlasError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
