//! Grid and occupant fixtures.
//!
//! Fixtures panic on invalid input; they are meant for tests only.

use tessera_core::Point;
use tessera_grid::{Grid, GridConfig, Occupant, Payload};

/// Shorthand for an integral point.
pub fn p(x: i32, y: i32) -> Point {
    Point::new(x, y)
}

/// A `width` x `height` grid at the origin.
pub fn grid<T: Payload>(width: i32, height: i32) -> Grid<T> {
    Grid::new(width, height).expect("fixture grid dimensions must be positive")
}

/// Like [`grid`], but distinct occupants may share cells.
pub fn overlapping_grid<T: Payload>(width: i32, height: i32) -> Grid<T> {
    Grid::with_config(GridConfig::new(width, height).with_overlapping(true))
        .expect("fixture grid dimensions must be positive")
}

/// A single-cell occupant named `name` at `(x, y)`.
pub fn token(name: &'static str, x: i32, y: i32) -> Occupant<&'static str> {
    Occupant::from_payload(name, p(x, y), [])
}

/// An occupant named `name` covering `cells`.
pub fn shaped(name: &'static str, cells: &[(i32, i32)]) -> Occupant<&'static str> {
    let mut points = cells.iter().map(|&(x, y)| p(x, y));
    let anchor = points.next().expect("fixture shape must not be empty");
    Occupant::from_payload(name, anchor, points)
}

/// A vertical bar of `len` cells whose top cell is `(x, y)`.
pub fn vertical_bar(name: &'static str, x: i32, y: i32, len: i32) -> Occupant<&'static str> {
    Occupant::from_payload(name, p(x, y), (1..len).map(|i| p(x, y + i)))
}

/// Fill every cell of `grid` row-major with numbered single-cell tokens,
/// stopping after `count`.
pub fn fill(grid: &Grid<u32>, count: u32) -> Vec<Occupant<u32>> {
    let region = grid.region();
    let occupants: Vec<_> = region
        .iter()
        .take(count as usize)
        .zip(0..)
        .map(|(cell, n)| Occupant::from_payload(n, cell, []))
        .collect();
    grid.insert_all(&occupants)
        .expect("fixture fill must fit the grid");
    occupants
}
