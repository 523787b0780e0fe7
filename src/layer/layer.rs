use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One input image to be placed in the atlas
#[derive(Debug, Clone)]
pub struct Layer {
    /// File the pixels were read from (empty for in-memory layers)
    pub path: PathBuf,
    /// Name written to the position map
    pub name: String,
    /// Hidden layers are left out when only visible layers are exported
    pub visible: bool,
    /// Pixel data
    pub image: RgbaImage,
}

impl Layer {
    /// A visible in-memory layer
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            path: PathBuf::new(),
            name: name.into(),
            visible: true,
            image,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }
}

/// Where a layer ended up in the atlas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedLayer {
    pub name: String,
    /// Left edge in the atlas
    pub x: u32,
    /// Top edge in the atlas
    pub y: u32,
    /// Layer width, without padding
    pub width: u32,
    /// Layer height, without padding
    pub height: u32,
}
