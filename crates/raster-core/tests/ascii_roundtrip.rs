//! Round-trip and format-error tests for the ASCII grid codec.

use raster_core::{read_grid, write_grid, GridRaster, RasterError, WriteOptions};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use test_utils::create_test_grid;

fn scratch_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

#[test]
fn test_write_read_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "coverage.asc");

    // Quarter-steps are exact in binary and at 12 decimal places, so the
    // text round trip must be lossless.
    let data: Vec<f64> = create_test_grid(5, 4).iter().map(|v| v * 0.25).collect();
    let grid = GridRaster::from_data(4, 5, data.clone()).unwrap();

    let options = WriteOptions {
        cellsize: 0.5,
        ..WriteOptions::default()
    };
    write_grid(&grid, &path, 99.36, -2.199, &options).unwrap();

    let back = read_grid(&path).unwrap();
    assert_eq!(back.rows(), 4);
    assert_eq!(back.columns(), 5);
    assert_eq!(back.cellsize(), 0.5);
    assert_eq!(back.data(), data.as_slice());

    // Read applies the half-cell registration shift to the written corner
    assert_eq!(back.xllcorner(), 99.36 + 0.25);
    assert_eq!(back.yllcorner(), -2.199 + 0.25);
}

#[test]
fn test_nan_written_as_integer_nodata() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "holes.asc");

    let grid = GridRaster::from_data(1, 3, vec![1.5, f64::NAN, 2.5]).unwrap();
    write_grid(&grid, &path, 0.0, 0.0, &WriteOptions::default()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let body = text.lines().nth(6).unwrap();
    assert_eq!(
        body.split_whitespace().collect::<Vec<_>>(),
        vec!["1.500000000000", "-9999", "2.500000000000"]
    );

    let back = read_grid(&path).unwrap();
    assert_eq!(back.data()[1], -9999.0);
    assert!(back.data_with_nan()[1].is_nan());
}

#[test]
fn test_header_layout() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "header.asc");

    let grid = GridRaster::from_data(2, 3, vec![0.0; 6]).unwrap();
    write_grid(&grid, &path, 95.06, -10.997, &WriteOptions::default()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "ncols         3");
    assert_eq!(lines[1], "nrows         2");
    assert_eq!(lines[2], "xllcorner     95.060000000000");
    assert_eq!(lines[3], "yllcorner     -10.997000000000");
    assert_eq!(lines[4], "cellsize      0.008333333333");
    assert_eq!(lines[5], "NODATA_value  -9999");
}

#[test]
fn test_projection_sidecar() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "proj.asc");

    let grid = GridRaster::from_data(1, 1, vec![1.0]).unwrap();
    let options = WriteOptions {
        projection: "GEOGCS[\"custom\"]".to_string(),
        ..WriteOptions::default()
    };
    write_grid(&grid, &path, 0.0, 0.0, &options).unwrap();

    let prj = fs::read_to_string(dir.path().join("proj.prj")).unwrap();
    assert_eq!(prj, "GEOGCS[\"custom\"]");
}

#[test]
fn test_rejects_file_not_starting_with_ncols() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "bad.asc");
    fs::write(
        &path,
        "rows 2\nncols 2\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -9999\n1 2\n3 4\n",
    )
    .unwrap();

    match read_grid(&path) {
        Err(RasterError::Format { line, .. }) => assert_eq!(line, 0),
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn test_rejects_bad_cellsize_line() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "bad.asc");
    fs::write(
        &path,
        "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\npixel 1\nNODATA_value -9999\n1 2\n3 4\n",
    )
    .unwrap();

    match read_grid(&path) {
        Err(RasterError::Format { line, .. }) => assert_eq!(line, 4),
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn test_rejects_bad_nodata_line() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "bad.asc");
    fs::write(
        &path,
        "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\nmissing -9999\n1 2\n3 4\n",
    )
    .unwrap();

    match read_grid(&path) {
        Err(RasterError::Format { line, .. }) => assert_eq!(line, 5),
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn test_row_length_mismatch_names_file_and_row() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "short_row.asc");
    fs::write(
        &path,
        "ncols 3\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -9999\n1 2 3\n4 5\n",
    )
    .unwrap();

    match read_grid(&path) {
        Err(RasterError::Format {
            file,
            line,
            message,
        }) => {
            assert!(file.contains("short_row.asc"));
            assert_eq!(line, 1);
            assert!(message.contains("got 2"));
            assert!(message.contains("expected 3"));
        }
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn test_missing_rows_rejected() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "short.asc");
    fs::write(
        &path,
        "ncols 2\nnrows 3\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -9999\n1 2\n3 4\n",
    )
    .unwrap();

    assert!(matches!(
        read_grid(&path),
        Err(RasterError::Format { line: 2, .. })
    ));
}

#[test]
fn test_non_numeric_token_rejected() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "token.asc");
    fs::write(
        &path,
        "ncols 2\nnrows 1\nxllcorner 0\nyllcorner 0\ncellsize 1\nNODATA_value -9999\n1 x\n",
    )
    .unwrap();

    match read_grid(&path) {
        Err(RasterError::Format { line, message, .. }) => {
            assert_eq!(line, 0);
            assert!(message.contains('x'));
        }
        other => panic!("expected format error, got {:?}", other),
    }
}

#[test]
fn test_truncated_header_rejected() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "trunc.asc");
    fs::write(&path, "ncols 2\nnrows 2\n").unwrap();

    assert!(matches!(
        read_grid(&path),
        Err(RasterError::Format { line: 2, .. })
    ));
}

#[test]
fn test_half_cell_shift_follows_header_cellsize() {
    let dir = TempDir::new().unwrap();
    let path = scratch_path(&dir, "shift.asc");
    fs::write(
        &path,
        "ncols 2\nnrows 2\nxllcorner 100.0\nyllcorner -8.0\ncellsize 0.2\nNODATA_value -9999\n1 2\n3 4\n",
    )
    .unwrap();

    let grid = read_grid(&path).unwrap();
    assert_eq!(grid.xllcorner(), 100.0 + 0.1);
    assert_eq!(grid.yllcorner(), -8.0 + 0.1);
    assert_eq!(grid.nodata_value(), -9999.0);
}
