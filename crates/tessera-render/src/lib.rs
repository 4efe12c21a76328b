//! Row-major traversal of a grid's viewport, driving pluggable formatters.
//!
//! [`GridWriter`] walks the visible cells of a
//! [`Grid`](tessera_grid::Grid) and reports grid, row and cell boundaries to
//! a [`GridFormatter`]. [`DelimitedFormatter`] is a ready-made formatter
//! writing one delimited line per row.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod delimited;
pub mod error;
pub mod formatter;
pub mod metadata;
pub mod writer;

pub use delimited::DelimitedFormatter;
pub use error::RenderError;
pub use formatter::GridFormatter;
pub use metadata::GridMetadata;
pub use writer::GridWriter;
