//! The [`Spatial`] trait: overlap and containment over position sets.

use tessera_core::Point;

use crate::region::Region;

/// Anything occupying a finite set of grid positions.
///
/// Implemented by [`Region`] and by grid occupants. The provided methods
/// define overlap and containment positionally; implementors may override
/// them with faster equivalents but must agree with these definitions.
pub trait Spatial {
    /// The first position in row-major order.
    fn top_left(&self) -> Point;

    /// All positions, row-major, without duplicates.
    fn positions(&self) -> Vec<Point>;

    /// Whether `point` is one of this value's positions.
    fn contains_point(&self, point: &Point) -> bool;

    /// Whether any of `points` is one of this value's positions.
    fn overlaps_any(&self, points: &[Point]) -> bool {
        points.iter().any(|p| self.contains_point(p))
    }

    /// Whether the two position sets share at least one position.
    fn overlaps(&self, other: &dyn Spatial) -> bool {
        self.overlaps_any(&other.positions())
    }

    /// Whether every position of `self` is a position of `other`.
    fn is_within(&self, other: &dyn Spatial) -> bool {
        self.positions().iter().all(|p| other.contains_point(p))
    }

    /// Downcast hook for the rectangle fast paths.
    fn as_region(&self) -> Option<&Region> {
        None
    }
}
