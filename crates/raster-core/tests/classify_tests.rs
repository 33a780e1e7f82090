//! Classification tests over the reference survey grid, run through the
//! ASCII codec the way a downloaded coverage would arrive.

use raster_core::{read_grid, write_grid, BinMode, GridRaster, WriteOptions};
use tempfile::TempDir;
use test_utils::{
    assert_approx_eq, reference_survey_grid, REFERENCE_COLUMNS, REFERENCE_MAX, REFERENCE_MIN,
    REFERENCE_NODATA, REFERENCE_ROWS, REFERENCE_VALID_CELLS,
};

/// Write the reference grid to disk and read it back, mirroring how real
/// coverages reach the classification engine.
fn reference_raster(dir: &TempDir) -> GridRaster {
    let data = reference_survey_grid();
    let grid = GridRaster::from_data(REFERENCE_ROWS, REFERENCE_COLUMNS, data).unwrap();

    let path = dir.path().join("survey.asc");
    write_grid(&grid, &path, 99.36, -2.199, &WriteOptions::default()).unwrap();
    read_grid(&path).unwrap()
}

#[test]
fn test_equidistant_bins_invariants() {
    let dir = TempDir::new().unwrap();
    let raster = reference_raster(&dir);
    let (min, max) = raster.extrema().unwrap();

    for n in [2usize, 3, 5, 7, 10, 16] {
        let levels = raster.bins(n, BinMode::Equidistant).unwrap();
        assert_eq!(levels.len(), n + 1);
        assert_eq!(levels[0], min);
        assert_eq!(levels[n], max);

        let d = (max - min) / n as f64;
        for (i, &level) in levels.iter().enumerate().take(n) {
            assert_eq!(level, min + i as f64 * d);
        }

        for pair in levels.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}

#[test]
fn test_quantile_bins_invariants_and_balance() {
    let dir = TempDir::new().unwrap();
    let raster = reference_raster(&dir);
    let (min, max) = raster.extrema().unwrap();

    let valid: Vec<f64> = raster
        .data_with_nan()
        .into_iter()
        .filter(|v| !v.is_nan())
        .collect();
    assert_eq!(valid.len(), REFERENCE_VALID_CELLS);

    for n in [2usize, 3, 5, 7, 10, 16] {
        let levels = raster.bins(n, BinMode::Quantile).unwrap();
        assert_eq!(levels.len(), n + 1);
        assert_eq!(levels[0], min);
        assert_eq!(levels[n], max);

        for pair in levels.windows(2) {
            assert!(pair[0] <= pair[1]);
        }

        // Interior bins hold roughly equal populations; the outermost bin
        // may be unbalanced.
        let average = valid.len() as f64 / n as f64;
        let mut reference_count: Option<i64> = None;
        for (i, pair) in levels.windows(2).enumerate() {
            if i + 1 == n {
                break;
            }
            let count = valid
                .iter()
                .filter(|&&v| pair[0] < v && v < pair[1])
                .count() as i64;
            if let Some(reference) = reference_count {
                assert!(
                    (count - reference).abs() <= 1,
                    "bin {} of {} holds {} values, first interior bin holds {}",
                    i,
                    n,
                    count,
                    reference
                );
            } else {
                reference_count = Some(count);
            }
            assert!((count as f64 - average).abs() <= 3.0);
        }
    }
}

#[test]
fn test_nodata_extraction() {
    let dir = TempDir::new().unwrap();
    let raster = reference_raster(&dir);

    assert_eq!(raster.nodata_value(), -9999.0);

    // Raw data: the sentinel dominates the minimum
    let raw_min = raster.data().iter().copied().fold(f64::INFINITY, f64::min);
    let raw_max = raster
        .data()
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(raw_min, REFERENCE_NODATA);
    assert_approx_eq!(raw_max, REFERENCE_MAX, 1e-9);

    // NaN view: the sentinel disappears and the true extrema emerge
    let view = raster.data_with_nan();
    assert_eq!(view.iter().filter(|v| v.is_nan()).count(), 5);
    assert_eq!(
        view.iter().filter(|v| !v.is_nan()).count(),
        REFERENCE_VALID_CELLS
    );

    let (min, max) = raster.extrema().unwrap();
    assert_approx_eq!(min, REFERENCE_MIN, 1e-9);
    assert_approx_eq!(max, REFERENCE_MAX, 1e-9);
}

#[test]
fn test_nan_view_idempotent_after_read() {
    let dir = TempDir::new().unwrap();
    let raster = reference_raster(&dir);

    let a = raster.data_with_nan();
    let b = raster.data_with_nan();
    let max_diff = a
        .iter()
        .zip(&b)
        .filter(|(x, y)| !x.is_nan() || !y.is_nan())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0f64, f64::max);
    assert_eq!(max_diff, 0.0);
    assert_eq!(
        a.iter().filter(|v| v.is_nan()).count(),
        b.iter().filter(|v| v.is_nan()).count()
    );
}
