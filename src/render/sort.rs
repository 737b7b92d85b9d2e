use std::cmp::Ordering;

use tracing::debug;

use crate::error::{RenderError, Result};
use crate::math::Bounds2;

use super::Cell;

/// Back-to-front draw order: larger depth first, then patch order, then
/// cell index. Signed zeros compare equal.
///
/// This is the painter's algorithm without any polygon clipping, so cells
/// that intersect or interlock can still be drawn in the wrong order.
#[must_use]
pub fn back_to_front(a: &Cell, b: &Cell) -> Ordering {
    (b.depth + 0.0)
        .total_cmp(&(a.depth + 0.0))
        .then(a.patch_order.cmp(&b.patch_order))
        .then(a.index.cmp(&b.index))
}

/// Depth-sorted cells plus the reductions the emitter needs up front.
#[derive(Debug, Clone)]
pub struct Scene {
    cells: Vec<Cell>,
    bounds: Bounds2,
    color_range: (f64, f64),
}

impl Scene {
    /// Sorts `cells` back to front and computes the global bounds and colour range.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyScene`] if there are no cells.
    pub fn new(mut cells: Vec<Cell>) -> Result<Self> {
        let bounds = cells
            .iter()
            .filter_map(|c| Bounds2::from_points(&c.vertices))
            .reduce(|acc, b| acc.union(&b))
            .ok_or(RenderError::EmptyScene)?;
        let color_range = cells
            .iter()
            .map(|c| c.color_value)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        cells.sort_by(back_to_front);
        debug!(
            cells = cells.len(),
            width = bounds.width(),
            height = bounds.height(),
            color_min = color_range.0,
            color_max = color_range.1,
            "scene sorted"
        );
        Ok(Self {
            cells,
            bounds,
            color_range,
        })
    }

    /// The cells, farthest first.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Bounds of every projected vertex.
    #[must_use]
    pub fn bounds(&self) -> &Bounds2 {
        &self.bounds
    }

    /// Smallest and largest colour value over all cells.
    #[must_use]
    pub fn color_range(&self) -> (f64, f64) {
        self.color_range
    }
}
