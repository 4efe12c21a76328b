//! The formatter contract driven by [`GridWriter`](crate::GridWriter).

use tessera_core::Point;
use tessera_grid::Occupant;

use crate::metadata::GridMetadata;

/// Receives a grid walk as a sequence of boundary callbacks.
///
/// The call sequence for one walk is `start_grid`, then for each visible
/// row `start_row`, one `cell` per visible cell, `end_row`, and finally
/// `end_grid`. The first `Err` stops the walk and is returned from
/// [`GridWriter::write`](crate::GridWriter::write); no further callbacks
/// follow it.
///
/// Only [`cell`](Self::cell) is required.
pub trait GridFormatter<T> {
    /// Error reported by this formatter.
    type Error;

    /// Called once before any row.
    fn start_grid(&mut self, _metadata: &GridMetadata) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called at the start of each row. `row` counts from the grid's top
    /// row, so a viewport below the top starts above zero.
    fn start_row(&mut self, _row: usize) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for each visible cell. `index` counts cells within the
    /// current row from zero; `occupants` holds everything covering
    /// `position`, possibly nothing.
    fn cell(
        &mut self,
        position: Point,
        index: usize,
        occupants: &[Occupant<T>],
    ) -> Result<(), Self::Error>;

    /// Called at the end of each row.
    fn end_row(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called once after the last row.
    fn end_grid(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
