use std::path::PathBuf;
use thiserror::Error;

/// Why a rectangle could not be placed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackError {
    #[error(
        "rectangle ({width}x{height}) exceeds packing area ({area_width}x{area_height})"
    )]
    DimensionExceedsArea {
        width: u32,
        height: u32,
        area_width: u32,
        area_height: u32,
    },

    #[error("no space available for rectangle ({width}x{height})")]
    NoSpaceAvailable { width: u32, height: u32 },

    #[error("rectangle ({width}x{height}) has no area")]
    EmptyRectangle { width: u32, height: u32 },
}

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No layers to pack")]
    NoLayers,

    #[error("Maximum width and height must be at least 1 (got {width}x{height})")]
    InvalidAreaSize { width: u32, height: u32 },

    #[error("Failed to pack layer '{name}' into the texture atlas: {source}")]
    LayerDoesNotFit { name: String, source: PackError },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("Invalid layer pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },
}
