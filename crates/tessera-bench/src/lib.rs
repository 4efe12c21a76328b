//! Benchmark profiles for the Tessera grid.
//!
//! - [`reference_profile`]: 100x100 grid holding 1K single-cell tokens
//! - [`stress_profile`]: 316x316 grid holding 2K tokens
//! - [`init_token_positions`]: deterministic token placement via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashSet;
use std::error::Error;

use tessera_core::Point;
use tessera_grid::{Grid, Occupant};

/// A populated benchmark grid and handles to its tokens.
pub struct Profile {
    pub grid: Grid<u32>,
    pub tokens: Vec<Occupant<u32>>,
}

/// 100x100 grid (10K cells) with 1K tokens.
pub fn reference_profile(seed: u64) -> Result<Profile, Box<dyn Error>> {
    build_profile(100, 100, 1_000, seed)
}

/// 316x316 grid (~100K cells) with 2K tokens.
pub fn stress_profile(seed: u64) -> Result<Profile, Box<dyn Error>> {
    build_profile(316, 316, 2_000, seed)
}

fn build_profile(width: i32, height: i32, n: u32, seed: u64) -> Result<Profile, Box<dyn Error>> {
    let grid = Grid::new(width, height)?;
    let cell_count = (width * height) as usize;
    let tokens: Vec<_> = init_token_positions(cell_count, n, seed)
        .into_iter()
        .map(|(id, index)| {
            let cell = Point::new((index % width as usize) as i32, (index / width as usize) as i32);
            Occupant::from_payload(id, cell, [])
        })
        .collect();
    grid.insert_all(&tokens)?;
    Ok(Profile { grid, tokens })
}

/// Generate deterministic token positions.
///
/// Spreads `n` tokens over `cell_count` cells with a simple hash of the
/// seed, probing linearly past collisions. Returns `(token_id, flat_index)`
/// pairs; flat indices are row-major.
pub fn init_token_positions(cell_count: usize, n: u32, seed: u64) -> Vec<(u32, usize)> {
    let mut positions = Vec::with_capacity(n as usize);
    let mut occupied = HashSet::new();

    for i in 0..n {
        let mut pos = (seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(u64::from(i).wrapping_mul(1442695040888963407))
            % cell_count as u64) as usize;
        while occupied.contains(&pos) {
            pos = (pos + 1) % cell_count;
        }
        occupied.insert(pos);
        positions.push((i, pos));
    }

    positions
}
