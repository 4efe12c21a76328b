//! Cardinal directions for single-step occupant movement.

use crate::point::Point;

/// Cardinal direction on the grid. `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// One row up (y - 1).
    Up = 0,
    /// One row down (y + 1).
    Down = 1,
    /// One column left (x - 1).
    Left = 2,
    /// One column right (x + 1).
    Right = 3,
}

impl Direction {
    /// All four directions, in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the (x_offset, y_offset) for one step in this direction.
    pub fn offset_2d(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Translation vector for `amount` steps in this direction.
    pub fn vector(self, amount: i32) -> Point {
        let (dx, dy) = self.offset_2d();
        Point::new(dx * amount, dy * amount)
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_scale_with_amount() {
        assert_eq!(Direction::Down.vector(1), Point::new(0, 1));
        assert_eq!(Direction::Left.vector(3), Point::new(-3, 0));
        assert_eq!(Direction::Up.vector(0), Point::ORIGIN);
    }

    #[test]
    fn opposite_cancels() {
        for d in Direction::ALL {
            assert_eq!(d.vector(2) + d.opposite().vector(2), Point::ORIGIN);
            assert_eq!(d.opposite().opposite(), d);
        }
    }
}
