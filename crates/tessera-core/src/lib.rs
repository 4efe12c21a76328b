//! Core types for the Tessera grid.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the rest of the workspace: the [`Point`] coordinate
//! and its rotation rules, cardinal [`Direction`]s, identifiers, occupant
//! [`Colour`] metadata, ordered [`Observers`] lists, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod colour;
pub mod direction;
pub mod error;
pub mod id;
pub mod observer;
pub mod point;

pub use colour::Colour;
pub use direction::Direction;
pub use error::GridError;
pub use id::{RuleId, SubscriptionId};
pub use observer::Observers;
pub use point::{rounding_policy, set_rounding_policy, sorted_shape, Point, RoundingPolicy, Shape};
