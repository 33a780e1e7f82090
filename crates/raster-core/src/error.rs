//! Error types for raster operations.

use thiserror::Error;

/// Result type alias using RasterError.
pub type Result<T> = std::result::Result<T, RasterError>;

/// Errors raised by the raster core.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Malformed ASCII grid header or body.
    ///
    /// `line` is 0-based: the header line for header failures, the data-row
    /// index for body failures.
    #[error("format error in {file} at line {line}: {message}")]
    Format {
        file: String,
        line: usize,
        message: String,
    },

    /// Two grids passed to an elementwise operation disagree on shape.
    #[error("grid shapes do not match: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A raster without enough valid cells for the requested statistic.
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Invalid grid dimensions or a data buffer of the wrong length.
    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    /// IO failure while reading or writing a grid file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RasterError {
    /// Create a Format error.
    pub fn format(file: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a DegenerateInput error.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateInput(msg.into())
    }

    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }
}
