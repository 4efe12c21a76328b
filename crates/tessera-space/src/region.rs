//! Axis-aligned rectangular regions.

use std::fmt;

use tessera_core::Point;

use crate::error::SpaceError;
use crate::spatial::Spatial;

/// An axis-aligned rectangle of integer cells.
///
/// The region covers `width * height` cells starting at `top_left`.
/// Half-cell offsets are never part of a region: the constructor drops
/// them from `top_left`, and offset points are never contained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    top_left: Point,
    width: i32,
    height: i32,
}

impl Region {
    /// Create a region anchored at `top_left`.
    ///
    /// Returns `Err(SpaceError::InvalidDimensions)` unless both dimensions
    /// are positive, and `Err(SpaceError::OutOfRange)` if the bottom-right
    /// cell would not fit in `i32`.
    pub fn new(top_left: Point, width: i32, height: i32) -> Result<Self, SpaceError> {
        if width <= 0 || height <= 0 {
            return Err(SpaceError::InvalidDimensions { width, height });
        }
        let fits = top_left.x.checked_add(width - 1).is_some()
            && top_left.y.checked_add(height - 1).is_some();
        if !fits {
            return Err(SpaceError::OutOfRange {
                top_left: Point::new(top_left.x, top_left.y),
                width,
                height,
            });
        }
        Ok(Self {
            top_left: Point::new(top_left.x, top_left.y),
            width,
            height,
        })
    }

    /// Create a region anchored at the origin.
    pub fn at_origin(width: i32, height: i32) -> Result<Self, SpaceError> {
        Self::new(Point::ORIGIN, width, height)
    }

    /// Smallest region covering every point in `points`, or `None` if
    /// `points` is empty or spans more than `i32::MAX` cells on an axis.
    pub fn bounding<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (*first, *first);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        let span = |lo: i32, hi: i32| hi.checked_sub(lo)?.checked_add(1);
        Some(Self {
            top_left: Point::new(min.x, min.y),
            width: span(min.x, max.x)?,
            height: span(min.y, max.y)?,
        })
    }

    /// The first cell, row-major.
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    /// The last cell, row-major: `top_left + (width - 1, height - 1)`.
    pub fn bottom_right(&self) -> Point {
        Point::new(
            self.top_left.x + self.width - 1,
            self.top_left.y + self.height - 1,
        )
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Iterate the cells row-major.
    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        let Point { x, y, .. } = self.top_left;
        (0..self.height).flat_map(move |dy| (0..self.width).map(move |dx| Point::new(x + dx, y + dy)))
    }

    /// Cells grouped by row, top to bottom.
    pub fn rows(&self) -> Vec<Vec<Point>> {
        let Point { x, y, .. } = self.top_left;
        (0..self.height)
            .map(|dy| (0..self.width).map(|dx| Point::new(x + dx, y + dy)).collect())
            .collect()
    }

    /// Whether `point` is one of this region's cells.
    pub fn contains(&self, point: &Point) -> bool {
        let br = self.bottom_right();
        !point.is_offset()
            && point.x >= self.top_left.x
            && point.x <= br.x
            && point.y >= self.top_left.y
            && point.y <= br.y
    }

    /// Whether every cell of `other` is a cell of `self`.
    pub fn contains_region(&self, other: &Region) -> bool {
        other.bounds_within(self)
    }

    /// Whether the two rectangles share at least one cell.
    pub fn intersects(&self, other: &Region) -> bool {
        let (a, b) = (self.bottom_right(), other.bottom_right());
        self.top_left.x <= b.x
            && other.top_left.x <= a.x
            && self.top_left.y <= b.y
            && other.top_left.y <= a.y
    }

    /// The shared cells of two regions, if any.
    pub fn intersection(&self, other: &Region) -> Option<Region> {
        if !self.intersects(other) {
            return None;
        }
        let (a, b) = (self.bottom_right(), other.bottom_right());
        let left = self.top_left.x.max(other.top_left.x);
        let top = self.top_left.y.max(other.top_left.y);
        Some(Region {
            top_left: Point::new(left, top),
            width: a.x.min(b.x) - left + 1,
            height: a.y.min(b.y) - top + 1,
        })
    }

    /// The same rectangle shifted by `vector`. Half-cell offsets in
    /// `vector` are ignored.
    ///
    /// Returns `Err(SpaceError::OutOfRange)` if any cell would leave the
    /// `i32` coordinate range.
    pub fn translate(&self, vector: Point) -> Result<Region, SpaceError> {
        let out_of_range = || SpaceError::OutOfRange {
            top_left: self.top_left,
            width: self.width,
            height: self.height,
        };
        let x = self.top_left.x.checked_add(vector.x).ok_or_else(out_of_range)?;
        let y = self.top_left.y.checked_add(vector.y).ok_or_else(out_of_range)?;
        Region::new(Point::new(x, y), self.width, self.height)
    }

    fn bounds_within(&self, other: &Region) -> bool {
        let (a, b) = (self.bottom_right(), other.bottom_right());
        self.top_left.x >= other.top_left.x
            && self.top_left.y >= other.top_left.y
            && a.x <= b.x
            && a.y <= b.y
    }
}

impl Spatial for Region {
    fn top_left(&self) -> Point {
        self.top_left
    }

    fn positions(&self) -> Vec<Point> {
        self.iter().collect()
    }

    fn contains_point(&self, point: &Point) -> bool {
        self.contains(point)
    }

    fn overlaps(&self, other: &dyn Spatial) -> bool {
        match other.as_region() {
            Some(region) => self.intersects(region),
            None => other.positions().iter().any(|p| self.contains(p)),
        }
    }

    fn is_within(&self, other: &dyn Spatial) -> bool {
        match other.as_region() {
            Some(region) => self.bounds_within(region),
            None => self.iter().all(|p| other.contains_point(&p)),
        }
    }

    fn as_region(&self) -> Option<&Region> {
        Some(self)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at {}", self.width, self.height, self.top_left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn r(x: i32, y: i32, w: i32, h: i32) -> Region {
        Region::new(p(x, y), w, h).unwrap()
    }

    /// A Spatial with no region fast path, for exercising the positional
    /// definitions.
    struct Cells(Vec<Point>);

    impl Spatial for Cells {
        fn top_left(&self) -> Point {
            self.0.iter().copied().min().unwrap_or_default()
        }
        fn positions(&self) -> Vec<Point> {
            self.0.clone()
        }
        fn contains_point(&self, point: &Point) -> bool {
            self.0.contains(point)
        }
    }

    fn arb_region() -> impl Strategy<Value = Region> {
        (-6i32..6, -6i32..6, 1i32..6, 1i32..6).prop_map(|(x, y, w, h)| r(x, y, w, h))
    }

    // ── Construction tests ─────────────────────────────────────

    #[test]
    fn rejects_non_positive_dimensions() {
        assert_eq!(
            Region::at_origin(0, 3),
            Err(SpaceError::InvalidDimensions {
                width: 0,
                height: 3
            })
        );
        assert!(Region::at_origin(3, -1).is_err());
    }

    #[test]
    fn bottom_right_is_inclusive() {
        let reg = r(2, 1, 3, 4);
        assert_eq!(reg.bottom_right(), p(4, 4));
        assert_eq!(r(0, 0, 1, 1).bottom_right(), p(0, 0));
    }

    #[test]
    fn constructor_drops_offsets() {
        let reg = Region::new(Point::with_offset(1, 1, true, true), 2, 2).unwrap();
        assert_eq!(reg.top_left(), p(1, 1));
    }

    #[test]
    fn bounding_covers_all_points() {
        let reg = Region::bounding(&[p(3, 1), p(1, 4), p(2, 2)]).unwrap();
        assert_eq!(reg, r(1, 1, 3, 4));
        assert!(Region::bounding(std::iter::empty::<&Point>()).is_none());
    }

    // ── Enumeration tests ──────────────────────────────────────

    #[test]
    fn positions_are_row_major() {
        let reg = r(1, 1, 2, 2);
        assert_eq!(
            reg.positions(),
            vec![p(1, 1), p(2, 1), p(1, 2), p(2, 2)]
        );
        assert_eq!(reg.rows(), vec![vec![p(1, 1), p(2, 1)], vec![p(1, 2), p(2, 2)]]);
    }

    #[test]
    fn region_compliance() {
        compliance::run_full_compliance(&r(0, 0, 4, 3));
        compliance::run_full_compliance(&r(-2, 5, 1, 1));
        compliance::run_full_compliance(&r(7, -3, 3, 5));
    }

    // ── Query tests ────────────────────────────────────────────

    #[test]
    fn contains_is_inclusive_and_rejects_offsets() {
        let reg = r(0, 0, 3, 3);
        assert!(reg.contains(&p(0, 0)));
        assert!(reg.contains(&p(2, 2)));
        assert!(!reg.contains(&p(3, 2)));
        assert!(!reg.contains(&p(-1, 0)));
        assert!(!reg.contains(&Point::with_offset(1, 1, true, false)));
    }

    #[test]
    fn overlap_between_regions() {
        let a = r(0, 0, 3, 3);
        assert!(a.overlaps(&r(2, 2, 3, 3)));
        assert!(!a.overlaps(&r(3, 0, 1, 1)));
        assert!(a.overlaps(&Cells(vec![p(9, 9), p(1, 1)])));
        assert!(!a.overlaps(&Cells(vec![p(9, 9)])));
    }

    #[test]
    fn intersection_is_shared_rectangle() {
        let a = r(0, 0, 4, 4);
        let b = r(2, 1, 5, 2);
        assert_eq!(a.intersection(&b), Some(r(2, 1, 2, 2)));
        assert_eq!(a.intersection(&r(10, 10, 1, 1)), None);
    }

    #[test]
    fn is_within_region_and_cells() {
        let inner = r(1, 1, 2, 2);
        let outer = r(0, 0, 4, 4);
        assert!(inner.is_within(&outer));
        assert!(!outer.is_within(&inner));
        assert!(inner.is_within(&inner));
        assert!(inner.is_within(&Cells(outer.positions())));
        assert!(!inner.is_within(&Cells(vec![p(1, 1), p(2, 1), p(1, 2)])));
    }

    #[test]
    fn translate_moves_anchor_only() {
        let moved = r(0, 0, 10, 20).translate(p(2, 1)).unwrap();
        assert_eq!(moved, r(2, 1, 10, 20));
        assert_eq!(moved.bottom_right(), p(11, 20));
    }

    #[test]
    fn regions_must_fit_the_coordinate_range() {
        assert_eq!(
            Region::new(p(i32::MAX - 1, 0), 5, 1),
            Err(SpaceError::OutOfRange {
                top_left: p(i32::MAX - 1, 0),
                width: 5,
                height: 1
            })
        );
        assert!(Region::new(p(0, i32::MAX), 1, 2).is_err());

        let edge = r(i32::MAX - 1, 0, 2, 1);
        assert_eq!(edge.bottom_right(), p(i32::MAX, 0));
        assert!(edge.contains(&p(i32::MAX, 0)));
        assert!(!edge.contains(&p(0, 0)));
        assert!(edge.is_within(&edge));
    }

    #[test]
    fn translate_rejects_overflow() {
        let edge = r(i32::MAX - 1, 0, 2, 1);
        assert!(matches!(edge.translate(p(1, 0)), Err(SpaceError::OutOfRange { .. })));
        assert!(r(i32::MIN, 0, 1, 1).translate(p(-1, 0)).is_err());
        assert_eq!(edge.translate(p(-1, 3)), Ok(r(i32::MAX - 2, 3, 2, 1)));
    }

    #[test]
    fn bounding_rejects_spans_wider_than_i32() {
        assert!(Region::bounding(&[p(i32::MIN, 0), p(i32::MAX, 0)]).is_none());
        assert_eq!(Region::bounding(&[p(i32::MAX, 0)]), Some(r(i32::MAX, 0, 1, 1)));
    }

    #[test]
    fn display_names_size_and_anchor() {
        assert_eq!(r(1, 2, 3, 4).to_string(), "3x4 at (1, 2)");
    }

    // ── Property tests ─────────────────────────────────────────

    proptest! {
        #[test]
        fn bound_fast_path_matches_positional_subset(a in arb_region(), b in arb_region()) {
            let positional = a.positions().iter().all(|q| b.contains(q));
            prop_assert_eq!(a.is_within(&b), positional);
            prop_assert_eq!(a.is_within(&Cells(b.positions())), positional);
            prop_assert_eq!(b.contains_region(&a), positional);
        }

        #[test]
        fn intersects_matches_shared_cells(a in arb_region(), b in arb_region()) {
            let shared = a.positions().iter().any(|q| b.contains(q));
            prop_assert_eq!(a.intersects(&b), shared);
            prop_assert_eq!(a.overlaps(&Cells(b.positions())), shared);
            prop_assert_eq!(a.intersection(&b).is_some(), shared);
        }

        #[test]
        fn positions_count_matches_cell_count(a in arb_region()) {
            prop_assert_eq!(a.positions().len(), a.cell_count());
        }
    }
}
