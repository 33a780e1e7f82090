//! Raster coverage model, ESRI ASCII grid codec, binned classification and
//! the ground-shaking fatality transform.

pub mod ascii;
pub mod classify;
pub mod error;
pub mod grid;
pub mod impact;

pub use ascii::{read_grid, write_grid, WriteOptions, DEFAULT_CELLSIZE, WGS84_WKT};
pub use classify::BinMode;
pub use error::{RasterError, Result};
pub use grid::{GridRaster, DEFAULT_NODATA};
pub use impact::{earthquake_fatality, FATALITY_A, FATALITY_B};
