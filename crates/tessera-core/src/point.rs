//! The [`Point`] coordinate, half-cell offsets, and rotation.
//!
//! A point is an integer cell coordinate that may additionally float at the
//! half-integer position on either axis. Offsets combine by XOR under
//! translation, so adding two half offsets lands back on an integer cell.
//!
//! Rotation of quarter turns is exact and never touches floating point.
//! Arbitrary angles are evaluated in floating point and rounded back to the
//! integer lattice according to the process-wide [`RoundingPolicy`].

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::sync::atomic::{AtomicU8, Ordering as AtomicOrdering};

use smallvec::SmallVec;

/// An ordered, deduplicated set of positions.
///
/// Shapes of up to four cells stay inline; larger shapes spill to the heap.
pub type Shape = SmallVec<[Point; 4]>;

// ── RoundingPolicy ─────────────────────────────────────────────────

/// How rotations by arbitrary angles snap back to integer cells.
///
/// The policy is process-wide: see [`set_rounding_policy`] and
/// [`rounding_policy`]. Quarter-turn rotations are exact under every policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RoundingPolicy {
    /// Round to the nearest cell, halves away from zero.
    #[default]
    Nearest = 0,
    /// Round toward zero.
    Truncate = 1,
    /// Round toward positive infinity.
    TruncateUp = 2,
    /// Never use floating point: arbitrary angles snap to the nearest
    /// quarter turn.
    Exact = 3,
}

impl RoundingPolicy {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Truncate,
            2 => Self::TruncateUp,
            3 => Self::Exact,
            _ => Self::Nearest,
        }
    }

    /// Apply this policy to a floating-point coordinate.
    ///
    /// [`Exact`](Self::Exact) behaves like [`Nearest`](Self::Nearest) here;
    /// it only differs in how [`Point::rotate_with`] treats the angle.
    pub fn round(self, v: f64) -> f64 {
        match self {
            Self::Nearest | Self::Exact => v.round(),
            Self::Truncate => v.trunc(),
            Self::TruncateUp => v.ceil(),
        }
    }
}

static ROUNDING_POLICY: AtomicU8 = AtomicU8::new(RoundingPolicy::Nearest as u8);

/// Set the process-wide rounding policy used by [`Point::rotate`].
pub fn set_rounding_policy(policy: RoundingPolicy) {
    ROUNDING_POLICY.store(policy as u8, AtomicOrdering::Relaxed);
}

/// The process-wide rounding policy currently in effect.
pub fn rounding_policy() -> RoundingPolicy {
    RoundingPolicy::from_u8(ROUNDING_POLICY.load(AtomicOrdering::Relaxed))
}

// ── Point ──────────────────────────────────────────────────────────

/// A 2D grid coordinate with optional half-cell offsets.
///
/// `y` grows downward. Points order row-major: by `y`, then `x`, with an
/// offset point ordering just after the integer point it floats beside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// The point sits at `x + 0.5`.
    pub offset_x: bool,
    /// The point sits at `y + 0.5`.
    pub offset_y: bool,
}

impl Point {
    /// The origin `(0, 0)`.
    pub const ORIGIN: Point = Point::new(0, 0);

    /// An integer point with no offsets.
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            offset_x: false,
            offset_y: false,
        }
    }

    /// A point with explicit half-cell offsets.
    pub const fn with_offset(x: i32, y: i32, offset_x: bool, offset_y: bool) -> Self {
        Self {
            x,
            y,
            offset_x,
            offset_y,
        }
    }

    /// Whether either axis carries a half-cell offset.
    pub fn is_offset(&self) -> bool {
        self.offset_x || self.offset_y
    }

    /// The logical (possibly fractional) column.
    pub fn logical_x(&self) -> f64 {
        f64::from(self.x) + if self.offset_x { 0.5 } else { 0.0 }
    }

    /// The logical (possibly fractional) row.
    pub fn logical_y(&self) -> f64 {
        f64::from(self.y) + if self.offset_y { 0.5 } else { 0.0 }
    }

    /// Componentwise sum; offset flags combine by XOR.
    pub fn translate(self, vector: Point) -> Point {
        Point {
            x: self.x.wrapping_add(vector.x),
            y: self.y.wrapping_add(vector.y),
            offset_x: self.offset_x ^ vector.offset_x,
            offset_y: self.offset_y ^ vector.offset_y,
        }
    }

    /// Negated coordinates, offsets kept.
    ///
    /// `p.translate(q).translate(q.negate()) == p` for every `p` and `q`.
    pub fn negate(self) -> Point {
        Point {
            x: self.x.wrapping_neg(),
            y: self.y.wrapping_neg(),
            offset_x: self.offset_x,
            offset_y: self.offset_y,
        }
    }

    /// Rotate about `origin` by `angle` degrees using the process-wide
    /// [`RoundingPolicy`].
    ///
    /// Positive angles turn clockwise on screen: `(0, -1)` rotated by 90
    /// about the origin becomes `(1, 0)`.
    pub fn rotate(self, origin: Point, angle: i32) -> Point {
        self.rotate_with(origin, angle, rounding_policy())
    }

    /// Rotate about `origin` by `angle` degrees under an explicit policy.
    pub fn rotate_with(self, origin: Point, angle: i32, policy: RoundingPolicy) -> Point {
        if angle % 90 == 0 {
            return self.rotate_quarters(origin, angle / 90);
        }
        if policy == RoundingPolicy::Exact {
            let quarters = (f64::from(angle) / 90.0).round() as i32;
            return self.rotate_quarters(origin, quarters);
        }

        let (sin, cos) = f64::from(angle).to_radians().sin_cos();
        let dx = self.logical_x() - origin.logical_x();
        let dy = self.logical_y() - origin.logical_y();
        let rx = origin.logical_x() + dx * cos - dy * sin;
        let ry = origin.logical_y() + dx * sin + dy * cos;
        Point::new(policy.round(rx) as i32, policy.round(ry) as i32)
    }

    /// Exact rotation by a whole number of clockwise quarter turns.
    ///
    /// Works in doubled coordinates so half-cell offsets survive exactly.
    fn rotate_quarters(self, origin: Point, quarters: i32) -> Point {
        let (px, py) = self.doubled();
        let (ox, oy) = origin.doubled();
        let (dx, dy) = (px - ox, py - oy);
        let (rx, ry) = match quarters.rem_euclid(4) {
            0 => (dx, dy),
            1 => (-dy, dx),
            2 => (-dx, -dy),
            _ => (dy, -dx),
        };
        Point::from_doubled(ox + rx, oy + ry)
    }

    fn doubled(self) -> (i64, i64) {
        (
            2 * i64::from(self.x) + i64::from(self.offset_x),
            2 * i64::from(self.y) + i64::from(self.offset_y),
        )
    }

    fn from_doubled(x2: i64, y2: i64) -> Point {
        Point {
            x: x2.div_euclid(2) as i32,
            y: y2.div_euclid(2) as i32,
            offset_x: x2.rem_euclid(2) == 1,
            offset_y: y2.rem_euclid(2) == 1,
        }
    }

    /// Bounding-box centroid of a set of points: per axis
    /// `min + (max - min) / 2`. `None` for an empty set.
    pub fn centroid<'a, I>(points: I) -> Option<Point>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        Some(Point::new(
            min_x + (max_x - min_x) / 2,
            min_y + (max_y - min_y) / 2,
        ))
    }
}

/// Sort a collection of points row-major and drop duplicates.
pub fn sorted_shape<I>(points: I) -> Shape
where
    I: IntoIterator<Item = Point>,
{
    let mut shape: Shape = points.into_iter().collect();
    shape.sort_unstable();
    shape.dedup();
    shape
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y
            .cmp(&other.y)
            .then(self.offset_y.cmp(&other.offset_y))
            .then(self.x.cmp(&other.x))
            .then(self.offset_x.cmp(&other.offset_x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        self.translate(rhs)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        self.translate(rhs.negate())
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        self.negate()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let half = |offset: bool| if offset { ".5" } else { "" };
        write!(
            f,
            "({}{}, {}{})",
            self.x,
            half(self.offset_x),
            self.y,
            half(self.offset_y)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn arb_point() -> impl Strategy<Value = Point> {
        (-1000i32..1000, -1000i32..1000, any::<bool>(), any::<bool>())
            .prop_map(|(x, y, ox, oy)| Point::with_offset(x, y, ox, oy))
    }

    fn arb_policy() -> impl Strategy<Value = RoundingPolicy> {
        prop_oneof![
            Just(RoundingPolicy::Nearest),
            Just(RoundingPolicy::Truncate),
            Just(RoundingPolicy::TruncateUp),
            Just(RoundingPolicy::Exact),
        ]
    }

    // ── Translation tests ──────────────────────────────────────

    #[test]
    fn translate_adds_components() {
        assert_eq!(p(1, 2).translate(p(3, -4)), p(4, -2));
        assert_eq!(p(1, 2) + p(3, -4), p(4, -2));
        assert_eq!(p(1, 2) - p(3, -4), p(-2, 6));
    }

    #[test]
    fn half_offsets_cancel_on_translate() {
        let half = Point::with_offset(0, 0, true, true);
        let a = Point::with_offset(2, 3, true, false);
        let moved = a.translate(half);
        assert_eq!(moved, Point::with_offset(2, 3, false, true));
    }

    #[test]
    fn equality_includes_offsets() {
        assert_ne!(p(2, 2), Point::with_offset(2, 2, true, false));
        assert_ne!(p(2, 2), Point::with_offset(2, 2, false, true));
        assert_eq!(
            Point::with_offset(2, 2, true, true),
            Point::with_offset(2, 2, true, true)
        );
    }

    // ── Ordering tests ─────────────────────────────────────────

    #[test]
    fn ordering_is_row_major() {
        let mut pts = vec![p(2, 1), p(0, 2), p(5, 0), p(1, 1)];
        pts.sort();
        assert_eq!(pts, vec![p(5, 0), p(1, 1), p(2, 1), p(0, 2)]);
    }

    #[test]
    fn offset_point_orders_after_its_integer_cell() {
        let half = Point::with_offset(1, 1, true, false);
        assert!(p(1, 1) < half);
        assert!(half < p(2, 1));
    }

    #[test]
    fn sorted_shape_dedups() {
        let shape = sorted_shape([p(1, 1), p(0, 0), p(1, 1)]);
        assert_eq!(shape.as_slice(), &[p(0, 0), p(1, 1)]);
    }

    // ── Rotation tests ─────────────────────────────────────────

    #[test]
    fn quarter_turn_is_clockwise_on_screen() {
        assert_eq!(p(0, -1).rotate_with(p(0, 0), 90, RoundingPolicy::Nearest), p(1, 0));
        assert_eq!(p(1, 0).rotate_with(p(0, 0), 90, RoundingPolicy::Nearest), p(0, 1));
        assert_eq!(p(0, -1).rotate_with(p(0, 0), 180, RoundingPolicy::Nearest), p(0, 1));
        assert_eq!(p(0, -1).rotate_with(p(0, 0), 270, RoundingPolicy::Nearest), p(-1, 0));
        assert_eq!(p(0, -1).rotate_with(p(0, 0), -90, RoundingPolicy::Nearest), p(-1, 0));
    }

    #[test]
    fn vertical_bar_turns_horizontal_about_pivot() {
        let pivot = p(5, 1);
        let turned: Vec<Point> = [p(5, 0), p(5, 1), p(5, 2)]
            .iter()
            .map(|q| q.rotate_with(pivot, 90, RoundingPolicy::Nearest))
            .collect();
        assert_eq!(turned, vec![p(6, 1), p(5, 1), p(4, 1)]);
    }

    #[test]
    fn quarter_turn_preserves_half_offsets() {
        let origin = Point::with_offset(0, 0, true, true);
        let q = p(0, 0).rotate_with(origin, 90, RoundingPolicy::Nearest);
        assert_eq!(q, p(1, 0));
        let back = q.rotate_with(origin, -90, RoundingPolicy::Nearest);
        assert_eq!(back, p(0, 0));
    }

    #[test]
    fn arbitrary_angle_rounds_per_policy() {
        // (2, 0) turned 45 degrees lands near (1.414, 1.414).
        let a = p(2, 0);
        assert_eq!(a.rotate_with(p(0, 0), 45, RoundingPolicy::Nearest), p(1, 1));
        assert_eq!(a.rotate_with(p(0, 0), 45, RoundingPolicy::Truncate), p(1, 1));
        assert_eq!(a.rotate_with(p(0, 0), 45, RoundingPolicy::TruncateUp), p(2, 2));
    }

    #[test]
    fn exact_policy_snaps_to_quarter_turns() {
        let a = p(0, -3);
        assert_eq!(a.rotate_with(p(0, 0), 80, RoundingPolicy::Exact), p(3, 0));
        assert_eq!(a.rotate_with(p(0, 0), 30, RoundingPolicy::Exact), a);
    }

    #[test]
    fn global_policy_round_trips() {
        let before = rounding_policy();
        set_rounding_policy(RoundingPolicy::TruncateUp);
        assert_eq!(rounding_policy(), RoundingPolicy::TruncateUp);
        set_rounding_policy(before);
        assert_eq!(rounding_policy(), before);
    }

    // ── Centroid tests ─────────────────────────────────────────

    #[test]
    fn centroid_floors_toward_min() {
        assert_eq!(Point::centroid(&[p(0, 0), p(3, 1)]), Some(p(1, 0)));
        assert_eq!(Point::centroid(&[p(5, 0), p(5, 1), p(5, 2)]), Some(p(5, 1)));
        assert_eq!(Point::centroid(&[p(-4, -4), p(-1, -1)]), Some(p(-3, -3)));
        assert_eq!(Point::centroid(std::iter::empty::<&Point>()), None);
    }

    #[test]
    fn display_marks_offsets() {
        assert_eq!(p(3, -1).to_string(), "(3, -1)");
        assert_eq!(Point::with_offset(2, 4, true, false).to_string(), "(2.5, 4)");
    }

    // ── Property tests ─────────────────────────────────────────

    proptest! {
        #[test]
        fn translate_then_negate_is_identity(a in arb_point(), v in arb_point()) {
            prop_assert_eq!(a.translate(v).translate(v.negate()), a);
            prop_assert_eq!((a + v) - v, a);
        }

        #[test]
        fn full_turn_is_exact(a in arb_point(), o in arb_point(), policy in arb_policy(), turns in -3i32..4) {
            prop_assert_eq!(a.rotate_with(o, 360 * turns, policy), a);
        }

        #[test]
        fn four_quarter_turns_compose_to_identity(a in arb_point(), o in arb_point()) {
            let mut q = a;
            for _ in 0..4 {
                q = q.rotate_with(o, 90, RoundingPolicy::Nearest);
            }
            prop_assert_eq!(q, a);
        }

        #[test]
        fn quarter_turn_preserves_distance(a in arb_point(), o in arb_point()) {
            let q = a.rotate_with(o, 90, RoundingPolicy::Truncate);
            let before = (a.logical_x() - o.logical_x()).powi(2) + (a.logical_y() - o.logical_y()).powi(2);
            let after = (q.logical_x() - o.logical_x()).powi(2) + (q.logical_y() - o.logical_y()).powi(2);
            prop_assert!((before - after).abs() < 1e-9);
        }
    }
}
