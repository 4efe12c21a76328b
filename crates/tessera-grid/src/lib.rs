//! Bounded 2D grid of movable multi-cell occupants.
//!
//! A [`Grid`] indexes [`Occupant`]s by top-left position and arbitrates
//! every move they make: bounds and overlap are hard errors, registered
//! constraints veto moves softly, and registered actions react to proposed
//! moves. Grid and occupant changes are published to ordered observer
//! lists, or through a crossbeam channel via
//! [`Grid::subscribe_channel`].
//!
//! ```
//! use tessera_core::{Direction, GridError, Point};
//! use tessera_grid::{Grid, Occupant};
//!
//! let grid = Grid::new(3, 3).unwrap();
//! let piece = Occupant::from_payload("A", Point::new(1, 1), []);
//! grid.insert(&piece).unwrap();
//!
//! assert_eq!(piece.step(Direction::Down), Ok(true));
//! assert_eq!(
//!     piece.step(Direction::Down),
//!     Err(GridError::OutOfBounds { position: Point::new(1, 3) })
//! );
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod events;
pub mod grid;
pub mod metrics;
pub mod occupant;
pub mod rules;

pub use config::{ActionPolicy, ConfigError, GridConfig};
pub use events::{EventChannel, GridEvent, RuleViolation};
pub use grid::{Grid, RenderFrame};
pub use metrics::GridMetrics;
pub use occupant::{MoveEvent, MoveKind, MoveProposal, Occupant};
pub use rules::{ActionFn, ConstraintHandle, Predicate};

/// Bound on occupant payloads held by a [`Grid`].
///
/// Payloads take part in occupant equality and cross threads with the
/// grid. Blanket-implemented for every eligible type.
pub trait Payload: PartialEq + Send + Sync + 'static {}

impl<T: PartialEq + Send + Sync + 'static> Payload for T {}
