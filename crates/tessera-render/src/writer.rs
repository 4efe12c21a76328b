//! Drives a [`GridFormatter`] over a grid's visible cells.

use tessera_core::Point;
use tessera_grid::{Grid, Occupant, Payload};

use crate::formatter::GridFormatter;
use crate::metadata::GridMetadata;

/// Walks a grid's viewport row-major and reports it to a formatter.
///
/// Rows are detected by a change of Y between successive cells. The walk
/// runs over a snapshot of geometry and cells taken together when it
/// starts; formatters may freely use the grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridWriter;

impl GridWriter {
    /// Walk `grid`, feeding `formatter`. Returns the formatter's first
    /// error, if any.
    pub fn write<T, F>(grid: &Grid<T>, formatter: &mut F) -> Result<(), F::Error>
    where
        T: Payload,
        F: GridFormatter<T>,
    {
        let frame = grid.render_frame();
        let metadata = GridMetadata::from_frame(&frame);
        formatter.start_grid(&metadata)?;

        let mut walk = Walk {
            formatter,
            grid_top: metadata.top_left.y,
            row: None,
            index: 0,
        };
        for (position, occupants) in &frame.cells {
            walk.cell(*position, occupants)?;
        }

        if walk.row.is_some() {
            walk.formatter.end_row()?;
        }
        walk.formatter.end_grid()
    }
}

struct Walk<'f, F> {
    formatter: &'f mut F,
    grid_top: i32,
    row: Option<i32>,
    index: usize,
}

impl<F> Walk<'_, F> {
    fn cell<T>(&mut self, position: Point, occupants: &[Occupant<T>]) -> Result<(), F::Error>
    where
        F: GridFormatter<T>,
    {
        if self.row != Some(position.y) {
            if self.row.is_some() {
                self.formatter.end_row()?;
            }
            // Frame cells lie inside the frame's region.
            let row = position.y.abs_diff(self.grid_top) as usize;
            self.formatter.start_row(row)?;
            self.row = Some(position.y);
            self.index = 0;
        }
        self.formatter.cell(position, self.index, occupants)?;
        self.index += 1;
        Ok(())
    }
}
