//! Reference data shared across the test suite.
//!
//! The survey grid mirrors the shape of a small field-survey coverage: 7x5
//! cells, five of them nodata, with known extrema. Tests assert against the
//! constants below rather than recomputing them.

/// Nodata sentinel used by the reference grid.
pub const REFERENCE_NODATA: f64 = -9999.0;

/// Smallest valid value in the reference grid.
pub const REFERENCE_MIN: f64 = -50.60135540866;

/// Largest valid value in the reference grid.
pub const REFERENCE_MAX: f64 = 50.9879837036;

/// Rows in the reference grid.
pub const REFERENCE_ROWS: usize = 7;

/// Columns in the reference grid.
pub const REFERENCE_COLUMNS: usize = 5;

/// Valid (non-nodata) cells in the reference grid.
pub const REFERENCE_VALID_CELLS: usize = 30;

/// Row-major reference survey grid: 35 cells, 5 nodata (every 7th cell),
/// 30 distinct valid values between [`REFERENCE_MIN`] and [`REFERENCE_MAX`].
pub fn reference_survey_grid() -> Vec<f64> {
    let mut values = Vec::with_capacity(REFERENCE_VALID_CELLS);
    values.push(REFERENCE_MIN);
    // Quarter-steps survive the 12-decimal text format exactly
    for i in 0..28 {
        values.push(-50.0 + i as f64 * 3.25);
    }
    values.push(REFERENCE_MAX);

    let total = REFERENCE_ROWS * REFERENCE_COLUMNS;
    let mut data = Vec::with_capacity(total);
    let mut next = values.into_iter();
    for i in 0..total {
        if i % 7 == 0 {
            data.push(REFERENCE_NODATA);
        } else {
            data.push(next.next().expect("fixture value count"));
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_grid_shape() {
        let data = reference_survey_grid();
        assert_eq!(data.len(), REFERENCE_ROWS * REFERENCE_COLUMNS);

        let nodata_count = data.iter().filter(|&&v| v == REFERENCE_NODATA).count();
        assert_eq!(nodata_count, 5);
        assert_eq!(data.len() - nodata_count, REFERENCE_VALID_CELLS);
    }

    #[test]
    fn test_reference_grid_extrema() {
        let data = reference_survey_grid();
        let valid: Vec<f64> = data
            .iter()
            .copied()
            .filter(|&v| v != REFERENCE_NODATA)
            .collect();
        let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
        let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min, REFERENCE_MIN);
        assert_eq!(max, REFERENCE_MAX);
    }
}
