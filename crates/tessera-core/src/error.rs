//! Error types for grid mutation.
//!
//! Constraint violations are not errors: a vetoed move is a
//! normal `Ok(false)` outcome, reported through the grid's rule-violated
//! notification.

use thiserror::Error;

use crate::point::Point;

/// Hard failures from grid insertion and occupant movement.
///
/// Any of these leaves the grid and the occupant exactly as they were.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A position would fall outside the grid region.
    #[error("position {position} lies outside the grid")]
    OutOfBounds {
        /// The first offending position.
        position: Point,
    },
    /// A position is already held by another occupant and the grid
    /// disallows overlap.
    #[error("position {position} is already occupied")]
    Overlap {
        /// The first colliding position.
        position: Point,
    },
    /// An equal occupant is already indexed.
    #[error("an equal occupant is already placed at {top_left}")]
    DuplicateOccupant {
        /// Top-left position of the existing occupant.
        top_left: Point,
    },
    /// The occupant belongs to a different grid.
    #[error("occupant is attached to another grid")]
    AttachedElsewhere,
    /// A move would leave the occupant without positions.
    #[error("shape must contain at least one position")]
    EmptyShape,
}
