use image::RgbaImage;

use crate::cli::LayerOrder;
use crate::layer::PackedLayer;

/// A completed texture atlas
#[derive(Debug)]
pub struct Atlas {
    /// Atlas width
    pub width: u32,
    /// Atlas height
    pub height: u32,
    /// Rendered atlas image
    pub image: RgbaImage,
    /// All layers packed into this atlas, in packing order
    pub layers: Vec<PackedLayer>,
    /// Ordering the layers were packed in
    pub order: LayerOrder,
    /// Share of the packing area covered by padded layers (0.0 to 1.0)
    pub occupancy: f64,
}

impl Atlas {
    pub fn new(width: u32, height: u32, order: LayerOrder) -> Self {
        Self {
            width,
            height,
            image: RgbaImage::new(width, height),
            layers: Vec::new(),
            order,
            occupancy: 0.0,
        }
    }
}
