use log::trace;

use super::skyline::{Placement, SkylineProfile};
use crate::error::PackError;

/// Places rectangles one at a time into a bounded area.
///
/// Callers decide the order in which rectangles are offered; a packer never
/// reorders or revisits earlier placements.
pub trait RectanglePacker {
    /// Area bounds as `(width, height)`.
    fn area(&self) -> (u32, u32);

    /// Place a rectangle, or return `None` without touching any state.
    fn try_pack(&mut self, width: u32, height: u32) -> Option<Placement>;

    /// Like [`try_pack`](Self::try_pack), but reports why nothing was placed.
    fn pack(&mut self, width: u32, height: u32) -> Result<Placement, PackError> {
        let (area_width, area_height) = self.area();

        if width > area_width || height > area_height {
            return Err(PackError::DimensionExceedsArea {
                width,
                height,
                area_width,
                area_height,
            });
        }
        if width == 0 || height == 0 {
            return Err(PackError::EmptyRectangle { width, height });
        }

        self.try_pack(width, height)
            .ok_or(PackError::NoSpaceAvailable { width, height })
    }
}

/// Packer that keeps every rectangle as low as possible.
///
/// It tracks the upper silhouette of the placed rectangles and, for each new
/// one, picks the leftmost x at which its top lands lowest.
#[derive(Debug, Clone)]
pub struct SkylinePacker {
    width: u32,
    height: u32,
    profile: SkylineProfile,
    used_area: u64,
}

impl SkylinePacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            profile: SkylineProfile::new(width),
            used_area: 0,
        }
    }

    /// Current silhouette, read-only.
    pub fn profile(&self) -> &SkylineProfile {
        &self.profile
    }

    /// Check if a rectangle of the given size can currently be placed
    pub fn can_fit(&self, width: u32, height: u32) -> bool {
        self.profile
            .find_placement(width, height, self.height)
            .is_some()
    }

    /// Get packing efficiency as a ratio (0.0 to 1.0)
    pub fn occupancy(&self) -> f64 {
        let total_area = u64::from(self.width) * u64::from(self.height);
        if total_area == 0 {
            return 0.0;
        }
        self.used_area as f64 / total_area as f64
    }
}

impl RectanglePacker for SkylinePacker {
    fn area(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn try_pack(&mut self, width: u32, height: u32) -> Option<Placement> {
        let Some(placement) = self.profile.find_placement(width, height, self.height) else {
            trace!("No placement for {}x{}", width, height);
            return None;
        };

        self.profile
            .integrate(placement.x, width, placement.y + height);
        self.used_area += u64::from(width) * u64::from(height);
        debug_assert!(self.profile.is_consistent());

        trace!(
            "Placed {}x{} at ({}, {})",
            width, height, placement.x, placement.y
        );

        Some(placement)
    }
}
