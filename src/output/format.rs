use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat};
use log::debug;

use crate::atlas::Atlas;
use crate::cli::CompressionLevel;
use crate::error::AtlasError;

/// Save the atlas image; the format is guessed from the file extension.
///
/// PNG output can additionally be recompressed with oxipng.
pub fn save_atlas_image(
    atlas: &Atlas,
    path: &Path,
    opaque: bool,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let format = ImageFormat::from_path(path).map_err(|e| AtlasError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    let image = if opaque {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(atlas.image.clone()).into_rgb8())
    } else {
        DynamicImage::ImageRgba8(atlas.image.clone())
    };

    // Encode in memory
    let mut encoded = Cursor::new(Vec::new());
    image
        .write_to(&mut encoded, format)
        .map_err(|e| AtlasError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let output_data = match compress {
        Some(level) if format == ImageFormat::Png => {
            let opts = match level {
                CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
                CompressionLevel::Max => oxipng::Options::max_compression(),
            };
            oxipng::optimize_from_memory(&encoded.into_inner(), &opts).map_err(|e| {
                AtlasError::PngCompress {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?
        }
        Some(_) => {
            debug!("Compression only applies to PNG output, skipping");
            encoded.into_inner()
        }
        None => encoded.into_inner(),
    };

    fs::write(path, output_data).map_err(|e| AtlasError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
