/// A point where the silhouette height changes.
///
/// From `x` rightward, up to the next breakpoint (or the area's right edge),
/// every column has height `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub x: u32,
    pub height: u32,
}

impl Breakpoint {
    pub fn new(x: u32, height: u32) -> Self {
        Self { x, height }
    }
}

/// Where a rectangle was (or would be) placed: left edge and top offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// Upper silhouette of everything packed so far in an area of fixed width.
///
/// Breakpoints are strictly increasing by `x` and the first one always sits
/// at `x = 0`, so every column in `[0, width)` belongs to exactly one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkylineProfile {
    width: u32,
    breakpoints: Vec<Breakpoint>,
}

impl SkylineProfile {
    /// Create an empty profile: a single zero-height span covering the width.
    pub fn new(width: u32) -> Self {
        Self {
            width,
            breakpoints: vec![Breakpoint::new(0, 0)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Height of the column at `x`, or `None` outside the area.
    pub fn height_at(&self, x: u32) -> Option<u32> {
        if x >= self.width {
            return None;
        }
        let index = self.breakpoints.partition_point(|b| b.x <= x);
        self.breakpoints.get(index.checked_sub(1)?).map(|b| b.height)
    }

    /// Tallest point of the silhouette.
    pub fn max_height(&self) -> u32 {
        self.breakpoints.iter().map(|b| b.height).max().unwrap_or(0)
    }

    /// Exclusive end of the span starting at breakpoint `index`.
    fn span_end(&self, index: usize) -> u32 {
        self.breakpoints
            .get(index + 1)
            .map_or(self.width, |next| next.x)
    }

    /// Find the lowest position for a `width` x `height` rectangle.
    ///
    /// Candidate positions are the breakpoint starts, scanned left to right.
    /// The window `[left, right)` holds the breakpoints under the rectangle's
    /// span; both ends only move forward. The first position reaching the
    /// lowest `y` wins ties.
    pub fn find_placement(&self, width: u32, height: u32, area_height: u32) -> Option<Placement> {
        if width == 0 || height == 0 || width > self.width || height > area_height {
            return None;
        }

        let slices = &self.breakpoints;
        let mut best: Option<Placement> = None;

        // A rectangle at x = 0 spans [0, width)
        let mut right = slices.partition_point(|b| b.x < width);

        for (left, start) in slices.iter().enumerate() {
            let Some(end) = start.x.checked_add(width) else {
                break;
            };
            // Every later start is further right, so nothing else fits either
            if end > self.width {
                break;
            }

            while right < slices.len() && slices[right].x < end {
                right += 1;
            }

            let highest = slices[left..right]
                .iter()
                .fold(0, |acc, b| acc.max(b.height));

            let fits = highest
                .checked_add(height)
                .is_some_and(|bottom| bottom <= area_height);

            if fits && best.is_none_or(|b| highest < b.y) {
                best = Some(Placement {
                    x: start.x,
                    y: highest,
                });
            }
        }

        best
    }

    /// Raise the silhouette over `[left, left + width)` to `bottom`.
    ///
    /// The caller guarantees the span lies inside the area and that `bottom`
    /// is at least the current height of every column under it.
    pub fn integrate(&mut self, left: u32, width: u32, bottom: u32) {
        debug_assert!(width > 0);
        debug_assert!(left + width <= self.width);

        let slices = &mut self.breakpoints;

        let start = slices.partition_point(|b| b.x < left);
        let original_height = if slices.get(start).is_some_and(|b| b.x == left) {
            std::mem::replace(&mut slices[start].height, bottom)
        } else {
            // `left` lies inside the span of the previous breakpoint; the
            // first breakpoint is at 0 so there always is one
            let enclosing = slices[start - 1].height;
            slices.insert(start, Breakpoint::new(left, bottom));
            enclosing
        };

        let right = left + width;
        let first_covered = start + 1;
        let end = first_covered + slices[first_covered..].partition_point(|b| b.x < right);

        if slices.get(end).is_some_and(|b| b.x == right) {
            // The next span already starts exactly where the rectangle ends
            slices.drain(first_covered..end);
            return;
        }

        let return_height = if end == first_covered {
            original_height
        } else {
            slices[end - 1].height
        };

        slices.drain(first_covered..end);

        if right < self.width {
            slices.insert(first_covered, Breakpoint::new(right, return_height));
        }
    }

    /// Check the structural invariants. Used by tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        self.breakpoints.first().is_some_and(|b| b.x == 0)
            && self.breakpoints.windows(2).all(|w| w[0].x < w[1].x)
            && self
                .breakpoints
                .last()
                .is_some_and(|b| self.width == 0 || b.x < self.width)
    }

    /// Iterate over `(start, end, height)` for every span.
    pub fn spans(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.breakpoints
            .iter()
            .enumerate()
            .map(|(i, b)| (b.x, self.span_end(i), b.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(width: u32, points: &[(u32, u32)]) -> SkylineProfile {
        SkylineProfile {
            width,
            breakpoints: points
                .iter()
                .map(|&(x, height)| Breakpoint::new(x, height))
                .collect(),
        }
    }

    fn points(profile: &SkylineProfile) -> Vec<(u32, u32)> {
        profile.breakpoints().iter().map(|b| (b.x, b.height)).collect()
    }

    #[test]
    fn test_new_profile_is_flat() {
        let p = SkylineProfile::new(16);
        assert_eq!(points(&p), vec![(0, 0)]);
        assert!(p.is_consistent());
        assert_eq!(p.height_at(0), Some(0));
        assert_eq!(p.height_at(15), Some(0));
        assert_eq!(p.height_at(16), None);
    }

    #[test]
    fn test_height_at_and_spans() {
        let p = profile(10, &[(0, 3), (4, 1), (7, 5)]);
        assert_eq!(p.height_at(3), Some(3));
        assert_eq!(p.height_at(4), Some(1));
        assert_eq!(p.height_at(9), Some(5));
        assert_eq!(p.max_height(), 5);
        assert_eq!(
            p.spans().collect::<Vec<_>>(),
            vec![(0, 4, 3), (4, 7, 1), (7, 10, 5)]
        );
    }

    #[test]
    fn test_find_on_empty_profile() {
        let p = SkylineProfile::new(10);
        assert_eq!(p.find_placement(4, 3, 10), Some(Placement { x: 0, y: 0 }));
    }

    #[test]
    fn test_find_rejects_oversized_and_empty() {
        let p = SkylineProfile::new(10);
        assert_eq!(p.find_placement(11, 1, 10), None);
        assert_eq!(p.find_placement(1, 11, 10), None);
        assert_eq!(p.find_placement(0, 1, 10), None);
        assert_eq!(p.find_placement(1, 0, 10), None);
    }

    #[test]
    fn test_find_uses_max_over_whole_span() {
        let p = profile(10, &[(0, 2), (3, 0)]);
        assert_eq!(p.find_placement(10, 1, 10), Some(Placement { x: 0, y: 2 }));
    }

    #[test]
    fn test_find_prefers_lowest_then_leftmost() {
        let p = profile(12, &[(0, 5), (3, 1), (6, 4), (9, 1)]);
        // Both x=3 and x=9 reach y=1; the scan keeps the first
        assert_eq!(p.find_placement(3, 2, 20), Some(Placement { x: 3, y: 1 }));
    }

    #[test]
    fn test_find_ignores_span_starting_at_right_edge() {
        // A rectangle ending exactly where a tall span starts is not blocked by it
        let p = profile(10, &[(0, 5), (2, 0), (6, 9)]);
        assert_eq!(p.find_placement(4, 1, 10), Some(Placement { x: 2, y: 0 }));
    }

    #[test]
    fn test_find_accepts_rectangle_ending_at_area_width() {
        let p = profile(10, &[(0, 6), (6, 0)]);
        assert_eq!(p.find_placement(4, 4, 10), Some(Placement { x: 6, y: 0 }));
    }

    #[test]
    fn test_find_respects_area_height() {
        let p = profile(10, &[(0, 8), (5, 6)]);
        assert_eq!(p.find_placement(5, 4, 10), Some(Placement { x: 5, y: 6 }));
        assert_eq!(p.find_placement(5, 5, 10), None);
    }

    #[test]
    fn test_find_bottom_exactly_at_area_height() {
        let p = profile(10, &[(0, 5)]);
        assert_eq!(p.find_placement(10, 5, 10), Some(Placement { x: 0, y: 5 }));
    }

    #[test]
    fn test_integrate_direct_hit_full_width() {
        let mut p = SkylineProfile::new(10);
        p.integrate(0, 10, 5);
        assert_eq!(points(&p), vec![(0, 5)]);
    }

    #[test]
    fn test_integrate_direct_hit_partial() {
        let mut p = SkylineProfile::new(10);
        p.integrate(0, 4, 3);
        assert_eq!(points(&p), vec![(0, 3), (4, 0)]);
    }

    #[test]
    fn test_integrate_mid_slice_start_and_end() {
        let mut p = SkylineProfile::new(10);
        p.integrate(2, 3, 4);
        assert_eq!(points(&p), vec![(0, 0), (2, 4), (5, 0)]);
    }

    #[test]
    fn test_integrate_start_in_last_slice_reaching_edge() {
        let mut p = profile(10, &[(0, 3), (4, 0)]);
        p.integrate(6, 4, 2);
        assert_eq!(points(&p), vec![(0, 3), (4, 0), (6, 2)]);
    }

    #[test]
    fn test_integrate_end_hits_existing_breakpoint() {
        let mut p = profile(10, &[(0, 3), (4, 1), (6, 2), (8, 0)]);
        p.integrate(4, 4, 5);
        assert_eq!(points(&p), vec![(0, 3), (4, 5), (8, 0)]);
    }

    #[test]
    fn test_integrate_end_inside_later_slice() {
        let mut p = profile(10, &[(0, 3), (4, 1), (6, 2), (8, 0)]);
        p.integrate(3, 4, 6);
        // Columns 7..8 still belong to the span that started at 6
        assert_eq!(points(&p), vec![(0, 3), (3, 6), (7, 2), (8, 0)]);
    }

    #[test]
    fn test_integrate_covers_tail() {
        let mut p = profile(10, &[(0, 3), (4, 1), (6, 2), (8, 0)]);
        p.integrate(5, 5, 7);
        assert_eq!(points(&p), vec![(0, 3), (4, 1), (5, 7)]);
    }

    #[test]
    fn test_integrate_within_single_slice_restores_height() {
        let mut p = profile(10, &[(0, 2), (8, 0)]);
        p.integrate(1, 3, 4);
        assert_eq!(points(&p), vec![(0, 2), (1, 4), (4, 2), (8, 0)]);
    }
}
