//! Elementwise risk-impact transform.

use crate::error::{RasterError, Result};
use crate::grid::{GridRaster, DEFAULT_NODATA};

/// Slope of the empirical ground-shaking fatality curve (Allen 2010).
pub const FATALITY_A: f64 = 0.97429;

/// Offset of the empirical ground-shaking fatality curve (Allen 2010).
pub const FATALITY_B: f64 = 11.037;

/// Estimated fatalities from ground shaking and population exposure:
///
/// `F = 10^(a*H - b) * E` per cell, with the published constants
/// [`FATALITY_A`] and [`FATALITY_B`].
///
/// Both grids must be co-registered with identical shape. The transform runs
/// over the nodata-as-NaN views of both inputs, so a missing cell on either
/// side yields NaN in the result through ordinary IEEE arithmetic; no
/// explicit masking is involved. The result keeps the hazard grid's
/// georeferencing, and its NaN cells become the nodata sentinel if the grid
/// is later serialized through the ASCII codec.
pub fn earthquake_fatality(hazard: &GridRaster, exposure: &GridRaster) -> Result<GridRaster> {
    if hazard.shape() != exposure.shape() {
        return Err(RasterError::ShapeMismatch {
            left: hazard.shape(),
            right: exposure.shape(),
        });
    }

    let h = hazard.data_with_nan();
    let e = exposure.data_with_nan();
    let data: Vec<f64> = h
        .iter()
        .zip(&e)
        .map(|(&h, &e)| 10f64.powf(FATALITY_A * h - FATALITY_B) * e)
        .collect();

    GridRaster::new(
        hazard.rows(),
        hazard.columns(),
        hazard.cellsize(),
        hazard.xllcorner(),
        hazard.yllcorner(),
        DEFAULT_NODATA,
        data,
    )
}
