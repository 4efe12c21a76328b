//! Spatial trait compliance test helpers.
//!
//! These functions verify that a [`Spatial`] implementation satisfies the
//! invariants required by the trait contract.

use crate::region::Region;
use crate::spatial::Spatial;
use indexmap::IndexSet;
use tessera_core::Point;

/// Assert that `positions` is sorted row-major and duplicate-free.
pub fn assert_positions_row_major_unique(shape: &dyn Spatial) {
    let positions = shape.positions();
    let unique: IndexSet<_> = positions.iter().collect();
    assert_eq!(unique.len(), positions.len(), "positions has duplicates");
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "positions not row-major: {positions:?}"
    );
}

/// Assert that `top_left` is the first position.
pub fn assert_top_left_is_first(shape: &dyn Spatial) {
    let positions = shape.positions();
    assert_eq!(
        positions.first().copied(),
        Some(shape.top_left()),
        "top_left is not the first position"
    );
}

/// Assert that `contains_point` accepts exactly the listed positions
/// within the bounding box, widened by one cell.
pub fn assert_contains_matches_positions(shape: &dyn Spatial) {
    let positions = shape.positions();
    let Some(bounds) = Region::bounding(&positions) else {
        panic!("shape has no positions");
    };
    let surroundings = Region::new(
        Point::new(bounds.top_left().x - 1, bounds.top_left().y - 1),
        bounds.width() + 2,
        bounds.height() + 2,
    )
    .expect("widened bounds are non-empty");
    for p in surroundings.iter() {
        assert_eq!(
            shape.contains_point(&p),
            positions.contains(&p),
            "contains_point({p:?}) disagrees with positions"
        );
    }
}

/// Assert that a shape is within itself and overlaps itself.
pub fn assert_reflexive(shape: &dyn Spatial) {
    assert!(shape.is_within(shape), "shape is not within itself");
    assert!(shape.overlaps(shape), "shape does not overlap itself");
}

/// Run all compliance checks on a shape.
pub fn run_full_compliance(shape: &dyn Spatial) {
    assert_positions_row_major_unique(shape);
    assert_top_left_is_first(shape);
    assert_contains_matches_positions(shape);
    assert_reflexive(shape);
}
