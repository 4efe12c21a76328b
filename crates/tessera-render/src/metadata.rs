//! Grid metadata handed to formatters before traversal.

use tessera_core::Point;
use tessera_grid::{Grid, Payload, RenderFrame};
use tessera_space::Region;

/// Geometry of the grid being rendered, captured when the walk starts.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMetadata {
    /// Top-left cell of the grid.
    pub top_left: Point,
    /// Number of columns in the grid.
    pub width: i32,
    /// Number of rows in the grid.
    pub height: i32,
    /// The sub-region being walked.
    pub viewport: Region,
    /// Rendered width of one cell.
    pub unit_width: f64,
    /// Rendered height of one cell.
    pub unit_height: f64,
}

impl GridMetadata {
    /// Capture the current geometry of `grid`.
    pub fn from_grid<T: Payload>(grid: &Grid<T>) -> Self {
        Self::from_frame(&grid.render_frame())
    }

    /// The geometry recorded in `frame`.
    pub fn from_frame<T>(frame: &RenderFrame<T>) -> Self {
        let (unit_width, unit_height) = frame.unit_size;
        Self {
            top_left: frame.region.top_left(),
            width: frame.region.width(),
            height: frame.region.height(),
            viewport: frame.viewport,
            unit_width,
            unit_height,
        }
    }

    /// Rendered size of the whole grid.
    pub fn pixel_size(&self) -> (f64, f64) {
        (
            f64::from(self.width) * self.unit_width,
            f64::from(self.height) * self.unit_height,
        )
    }
}
