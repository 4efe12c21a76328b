//! Error types for the bundled formatters.

use std::io;

/// Failure while writing rendered output.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The underlying writer failed.
    #[error("failed to write rendered grid: {0}")]
    Io(#[from] io::Error),
}
