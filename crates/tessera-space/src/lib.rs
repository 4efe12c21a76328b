//! Rectangular regions and spatial queries for Tessera.
//!
//! This crate defines the [`Spatial`] trait, the common vocabulary for
//! overlap and containment between anything that occupies grid cells, and
//! [`Region`], the axis-aligned rectangle used for grid bounds and
//! viewports.
//!
//! Containment is defined positionally (every position of one value is a
//! position of the other). Rectangles answer the same questions from their
//! bounds when both sides are regions.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod region;
pub mod spatial;

#[cfg(test)]
pub(crate) mod compliance;

pub use error::SpaceError;
pub use region::Region;
pub use spatial::Spatial;
