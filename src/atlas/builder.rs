use std::cmp::Reverse;

use anyhow::Result;
use image::imageops;
use log::{debug, info};
use rayon::prelude::*;

use super::Atlas;
use crate::cli::{LayerOrder, PackMode};
use crate::error::AtlasError;
use crate::layer::{Layer, PackedLayer};
use crate::packing::{Placement, RectanglePacker, SkylinePacker};

/// Configuration for atlas building
pub struct AtlasBuilder {
    pub max_width: u32,
    pub max_height: u32,
    pub padding: u32,
    pub power_of_two: bool,
    pub trim: bool,
    pub only_visible: bool,
    pub order: LayerOrder,
    pub pack_mode: PackMode,
}

/// Result of packing every layer in one ordering, before rendering
struct PackingLayout {
    order: LayerOrder,
    /// Layer index and placement, in packing order
    placements: Vec<(usize, Placement)>,
    extent_width: u32,
    extent_height: u32,
    occupancy: f64,
}

impl PackingLayout {
    fn extent_area(&self) -> u64 {
        u64::from(self.extent_width) * u64::from(self.extent_height)
    }
}

impl AtlasBuilder {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            padding: 0,
            power_of_two: false,
            trim: true,
            only_visible: true,
            order: LayerOrder::Input,
            pack_mode: PackMode::Single,
        }
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    pub fn power_of_two(mut self, pot: bool) -> Self {
        self.power_of_two = pot;
        self
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn only_visible(mut self, only_visible: bool) -> Self {
        self.only_visible = only_visible;
        self
    }

    pub fn order(mut self, order: LayerOrder) -> Self {
        self.order = order;
        self
    }

    pub fn pack_mode(mut self, pack_mode: PackMode) -> Self {
        self.pack_mode = pack_mode;
        self
    }

    /// Size of the packing area handed to the packer
    pub fn area_size(&self) -> (u32, u32) {
        if self.power_of_two {
            (
                nearest_power_of_two(self.max_width),
                nearest_power_of_two(self.max_height),
            )
        } else {
            (self.max_width, self.max_height)
        }
    }

    /// Pack the layers and render the atlas.
    ///
    /// The first layer that cannot be placed aborts the whole run.
    pub fn build(&self, layers: Vec<Layer>) -> Result<Atlas> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(AtlasError::InvalidAreaSize {
                width: self.max_width,
                height: self.max_height,
            }
            .into());
        }

        let layers: Vec<Layer> = layers
            .into_iter()
            .filter(|layer| layer.visible || !self.only_visible)
            .map(|mut layer| {
                layer.visible = true;
                layer
            })
            .collect();

        if layers.is_empty() {
            return Err(AtlasError::NoLayers.into());
        }

        let (area_width, area_height) = self.area_size();
        debug!(
            "Packing {} layers into {}x{} (padding {})",
            layers.len(),
            area_width,
            area_height,
            self.padding
        );

        let layout = self.find_layout(&layers, area_width, area_height)?;
        Ok(self.apply_layout(&layers, layout, area_width, area_height))
    }

    /// Orderings to try; the configured one goes first so it wins ties
    fn orderings(&self) -> Vec<LayerOrder> {
        match self.pack_mode {
            PackMode::Single => vec![self.order],
            PackMode::Best => std::iter::once(self.order)
                .chain(LayerOrder::ALL.into_iter().filter(|&o| o != self.order))
                .collect(),
        }
    }

    fn find_layout(
        &self,
        layers: &[Layer],
        area_width: u32,
        area_height: u32,
    ) -> Result<PackingLayout, AtlasError> {
        // Each ordering gets its own packer, so the attempts are independent
        let attempts: Vec<Result<PackingLayout, AtlasError>> = self
            .orderings()
            .into_par_iter()
            .map(|order| self.try_pack(layers, order, area_width, area_height))
            .collect();

        let mut best: Option<PackingLayout> = None;
        let mut first_error = None;

        for attempt in attempts {
            match attempt {
                Ok(layout) => {
                    debug!(
                        "Ordering {:?}: extent {}x{}, occupancy {:.1}%",
                        layout.order,
                        layout.extent_width,
                        layout.extent_height,
                        layout.occupancy * 100.0
                    );
                    if best
                        .as_ref()
                        .is_none_or(|b| layout.extent_area() < b.extent_area())
                    {
                        best = Some(layout);
                    }
                }
                Err(e) => {
                    debug!("Ordering failed: {}", e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match (best, first_error) {
            (Some(layout), _) => Ok(layout),
            (None, Some(e)) => Err(e),
            (None, None) => Err(AtlasError::NoLayers),
        }
    }

    /// Pack every layer in the given order, without rendering
    fn try_pack(
        &self,
        layers: &[Layer],
        order: LayerOrder,
        area_width: u32,
        area_height: u32,
    ) -> Result<PackingLayout, AtlasError> {
        let mut packer = SkylinePacker::new(area_width, area_height);
        let mut placements = Vec::with_capacity(layers.len());
        let mut extent_width = 0u32;
        let mut extent_height = 0u32;

        for i in sorted_indices(layers, order) {
            let layer = &layers[i];
            let padded_w = layer.width().saturating_add(self.padding);
            let padded_h = layer.height().saturating_add(self.padding);

            let placement =
                packer
                    .pack(padded_w, padded_h)
                    .map_err(|source| AtlasError::LayerDoesNotFit {
                        name: layer.name.clone(),
                        source,
                    })?;

            extent_width = extent_width.max(placement.x + layer.width());
            extent_height = extent_height.max(placement.y + layer.height());
            placements.push((i, placement));
        }

        Ok(PackingLayout {
            order,
            placements,
            extent_width,
            extent_height,
            occupancy: packer.occupancy(),
        })
    }

    /// Render the layout into the final atlas
    fn apply_layout(
        &self,
        layers: &[Layer],
        layout: PackingLayout,
        area_width: u32,
        area_height: u32,
    ) -> Atlas {
        let (final_width, final_height) = if self.trim {
            let (w, h) = (layout.extent_width.max(1), layout.extent_height.max(1));
            if self.power_of_two {
                (
                    nearest_power_of_two(w).min(area_width),
                    nearest_power_of_two(h).min(area_height),
                )
            } else {
                (w, h)
            }
        } else {
            (area_width, area_height)
        };

        let mut atlas = Atlas::new(final_width, final_height, layout.order);
        atlas.occupancy = layout.occupancy;

        for (i, placement) in layout.placements {
            let layer = &layers[i];

            imageops::overlay(
                &mut atlas.image,
                &layer.image,
                i64::from(placement.x),
                i64::from(placement.y),
            );

            atlas.layers.push(PackedLayer {
                name: layer.name.clone(),
                x: placement.x,
                y: placement.y,
                width: layer.width(),
                height: layer.height(),
            });
        }

        let ordering_info = match self.pack_mode {
            PackMode::Best => format!(" (best ordering: {:?})", layout.order),
            PackMode::Single => String::new(),
        };

        info!(
            "Atlas {}x{} with {} layers ({:.1}% efficiency){}",
            final_width,
            final_height,
            atlas.layers.len(),
            layout.occupancy * 100.0,
            ordering_info,
        );

        atlas
    }
}

/// Layer indices in the order they are offered to the packer.
/// Sorting is stable, so equal keys keep their input order.
fn sorted_indices(layers: &[Layer], order: LayerOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..layers.len()).collect();

    match order {
        LayerOrder::Input => {}
        LayerOrder::Area => indices.sort_by_key(|&i| Reverse(layers[i].area())),
        LayerOrder::Height => indices.sort_by_key(|&i| Reverse(layers[i].height())),
        LayerOrder::Width => indices.sort_by_key(|&i| Reverse(layers[i].width())),
        LayerOrder::MaxSide => {
            indices.sort_by_key(|&i| Reverse(layers[i].width().max(layers[i].height())))
        }
    }

    indices
}

/// Round up to the nearest power of two; powers of two map to themselves.
pub fn nearest_power_of_two(n: u32) -> u32 {
    if n == 0 {
        return 1;
    }
    let mut v = n - 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v.wrapping_add(1)
}
