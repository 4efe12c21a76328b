//! Tessera: bounded 2D grids of movable multi-cell occupants.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Tessera sub-crates. For most users, adding `tessera` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! // A 3x3 grid with one piece in the middle.
//! let grid = Grid::new(3, 3).unwrap();
//! let piece = Occupant::from_payload("A", Point::new(1, 1), []);
//! grid.insert(&piece).unwrap();
//!
//! // Pieces may not enter the bottom row.
//! let rule = grid.add_constraint(|_, candidate| candidate.iter().any(|p| p.y > 1));
//! let vetoed = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
//! let flag = vetoed.clone();
//! grid.on_rule_violated(move |violation| {
//!     assert_eq!(violation.rule, rule.id);
//!     flag.store(true, std::sync::atomic::Ordering::Relaxed);
//! });
//!
//! assert_eq!(piece.step(Direction::Right), Ok(true));
//! assert_eq!(piece.step(Direction::Down), Ok(false));
//! assert!(vetoed.load(std::sync::atomic::Ordering::Relaxed));
//! assert_eq!(piece.top_left(), Point::new(2, 1));
//!
//! // Walking off the grid is a hard error.
//! assert_eq!(
//!     piece.step(Direction::Right),
//!     Err(GridError::OutOfBounds { position: Point::new(3, 1) })
//! );
//!
//! // Render the grid as tab-separated rows.
//! let mut out = DelimitedFormatter::new(Vec::new());
//! GridWriter::write(&grid, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out.into_inner()).unwrap(), "\t\t\n\t\tA\n\t\t\n");
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessera-core` | Points, rotation, directions, ids, observers, errors |
//! | [`space`] | `tessera-space` | Regions and the `Spatial` containment trait |
//! | [`grid`] | `tessera-grid` | The grid, occupants, rules, events and config |
//! | [`render`] | `tessera-render` | Viewport traversal and formatters |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core geometry, identifiers, and errors (`tessera-core`).
///
/// Contains [`types::Point`] with its rotation rules, the process-wide
/// [`types::RoundingPolicy`], and [`types::GridError`].
pub use tessera_core as types;

/// Rectangular regions and containment (`tessera-space`).
///
/// Provides [`space::Region`] and the [`space::Spatial`] trait shared by
/// regions, occupants and grids.
pub use tessera_space as space;

/// The grid and its occupants (`tessera-grid`).
///
/// [`grid::Grid`] arbitrates moves of [`grid::Occupant`]s against bounds,
/// overlap, and registered constraints.
pub use tessera_grid as grid;

/// Viewport traversal (`tessera-render`).
///
/// [`render::GridWriter`] drives any [`render::GridFormatter`].
pub use tessera_render as render;

/// Common imports for typical Tessera usage.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tessera_core::{Colour, Direction, GridError, Point, RoundingPolicy, RuleId};

    // Space
    pub use tessera_space::{Region, Spatial};

    // Grid
    pub use tessera_grid::{
        ActionPolicy, ConstraintHandle, Grid, GridConfig, GridEvent, MoveEvent, MoveProposal,
        Occupant, RuleViolation,
    };

    // Rendering
    pub use tessera_render::{DelimitedFormatter, GridFormatter, GridWriter};
}
