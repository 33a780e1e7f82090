//! In-memory model of a single-band gridded raster coverage.

use crate::error::{RasterError, Result};

/// Nodata sentinel used when a grid does not declare one.
pub const DEFAULT_NODATA: f64 = -9999.0;

/// A single-band raster coverage on a regular square-pixel grid.
///
/// Data is stored row-major with the northernmost row first. `xllcorner` and
/// `yllcorner` are the coordinates of the **center** of the lower-left cell;
/// the ASCII codec applies the half-cell registration shift when reading
/// corner-registered files (see [`crate::ascii::read_grid`]).
///
/// Cells holding `nodata_value` mark missing observations. Statistics never
/// see the sentinel: they operate on the nodata-as-NaN view produced by
/// [`GridRaster::data_with_nan`].
#[derive(Debug, Clone)]
pub struct GridRaster {
    rows: usize,
    columns: usize,
    cellsize: f64,
    xllcorner: f64,
    yllcorner: f64,
    nodata_value: f64,
    data: Vec<f64>,
}

impl GridRaster {
    /// Create a raster from fully specified metadata and row-major data.
    pub fn new(
        rows: usize,
        columns: usize,
        cellsize: f64,
        xllcorner: f64,
        yllcorner: f64,
        nodata_value: f64,
        data: Vec<f64>,
    ) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(RasterError::invalid_grid(format!(
                "grid dimensions must be positive, got {}x{}",
                rows, columns
            )));
        }
        if !(cellsize > 0.0) {
            return Err(RasterError::invalid_grid(format!(
                "cellsize must be positive, got {}",
                cellsize
            )));
        }
        if data.len() != rows * columns {
            return Err(RasterError::invalid_grid(format!(
                "data length {} does not match {}x{} grid",
                data.len(),
                rows,
                columns
            )));
        }

        Ok(Self {
            rows,
            columns,
            cellsize,
            xllcorner,
            yllcorner,
            nodata_value,
            data,
        })
    }

    /// Create a derived raster from row-major data alone.
    ///
    /// Georeferencing defaults to the origin with the standard cell size;
    /// used for computed grids whose placement is supplied at write time.
    pub fn from_data(rows: usize, columns: usize, data: Vec<f64>) -> Result<Self> {
        Self::new(
            rows,
            columns,
            crate::ascii::DEFAULT_CELLSIZE,
            0.0,
            0.0,
            DEFAULT_NODATA,
            data,
        )
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Dimensions as (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Cell size (square pixels).
    pub fn cellsize(&self) -> f64 {
        self.cellsize
    }

    /// X coordinate of the lower-left cell center.
    pub fn xllcorner(&self) -> f64 {
        self.xllcorner
    }

    /// Y coordinate of the lower-left cell center.
    pub fn yllcorner(&self) -> f64 {
        self.yllcorner
    }

    /// The nodata sentinel.
    pub fn nodata_value(&self) -> f64 {
        self.nodata_value
    }

    /// Raw row-major data, sentinel included.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at (row, col), row 0 northernmost.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        Some(self.data[row * self.columns + col])
    }

    /// The nodata-as-NaN view: a fresh copy of the data with every cell
    /// equal to `nodata_value` replaced by NaN.
    ///
    /// Recomputed on every call and never cached, so the sentinel can never
    /// leak into statistics. NaN already present in the data (e.g. in a
    /// computed impact grid) passes through unchanged.
    pub fn data_with_nan(&self) -> Vec<f64> {
        self.data
            .iter()
            .map(|&v| if v == self.nodata_value { f64::NAN } else { v })
            .collect()
    }
}
