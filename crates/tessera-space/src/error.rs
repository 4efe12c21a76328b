//! Error types for geometry construction.

use tessera_core::Point;
use thiserror::Error;

/// Errors arising from region or shape construction.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpaceError {
    /// A region was given a non-positive width or height.
    #[error("region dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
    /// A region's far corner would fall outside the `i32` coordinate range.
    #[error("region of {width}x{height} at {top_left} exceeds the coordinate range")]
    OutOfRange {
        /// Requested top-left cell.
        top_left: Point,
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
    /// A shape was built from an empty position set.
    #[error("shape must contain at least one position")]
    EmptyShape,
}
