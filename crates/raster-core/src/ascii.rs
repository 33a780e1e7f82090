//! ESRI ASCII grid codec.
//!
//! The text layout is fixed: a 6-line header (`ncols`, `nrows`, `xllcorner`,
//! `yllcorner`, `cellsize`, `NODATA_value`) followed by `nrows` lines of
//! `ncols` whitespace-separated values, northernmost row first. A sibling
//! `.prj` file carries the projection WKT verbatim.
//!
//! The header registers the grid to the corner of the lower-left cell.
//! [`read_grid`] shifts the stored origin by half a cell so the in-memory
//! raster is center-registered; [`write_grid`] does NOT undo the shift and
//! expects corner-aligned coordinates from the caller. Getting this offset
//! wrong is the classic half-cell bug when exchanging grids with
//! center-registered consumers.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{RasterError, Result};
use crate::grid::{GridRaster, DEFAULT_NODATA};

/// Default cell size in degrees, approximately 1/120.
pub const DEFAULT_CELLSIZE: f64 = 0.0083333333333333;

/// Projection written alongside grids that do not specify one.
pub const WGS84_WKT: &str = "GEOGCS[\"GCS_WGS_1984\",DATUM[\"D_WGS_1984\",\
SPHEROID[\"WGS_1984\",6378137.0,298.257223563]],PRIMEM[\"Greenwich\",0.0],\
UNIT[\"Degree\",0.0174532925199433]]";

/// Options for [`write_grid`].
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Cell size written to the header.
    pub cellsize: f64,
    /// Sentinel written for NaN cells, formatted as an integer.
    pub nodata_value: f64,
    /// WKT text for the sibling `.prj` file.
    pub projection: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            cellsize: DEFAULT_CELLSIZE,
            nodata_value: DEFAULT_NODATA,
            projection: WGS84_WKT.to_string(),
        }
    }
}

/// Read an ESRI ASCII grid file into a [`GridRaster`].
///
/// The stored origin is the header corner shifted by `+cellsize/2`, i.e. the
/// center of the lower-left cell. The file handle is released on every exit
/// path, including a format error mid-parse.
pub fn read_grid(path: impl AsRef<Path>) -> Result<GridRaster> {
    let path = path.as_ref();
    let file_name = path.display().to_string();

    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    let mut header = Vec::with_capacity(6);
    for i in 0..6 {
        match lines.next() {
            Some(line) => header.push(line?),
            None => {
                return Err(RasterError::format(
                    &file_name,
                    i,
                    "truncated header: expected 6 lines",
                ))
            }
        }
    }

    // First header line decides whether this is an ASCII grid at all
    let fields: Vec<&str> = header[0].split_whitespace().collect();
    if fields.first().copied() != Some("ncols") {
        return Err(RasterError::format(
            &file_name,
            0,
            "does not look like an ASCII grid file: it must start with ncols",
        ));
    }
    if fields.len() != 2 {
        return Err(RasterError::format(
            &file_name,
            0,
            "ncols line must hold exactly one value",
        ));
    }
    let ncols: usize = fields[1]
        .parse()
        .map_err(|_| RasterError::format(&file_name, 0, "ncols is not an integer"))?;

    let nrows: usize = header_value(&header[1], &file_name, 1)?
        .parse()
        .map_err(|_| RasterError::format(&file_name, 1, "nrows is not an integer"))?;

    if !header[4].starts_with("cellsize") {
        return Err(RasterError::format(
            &file_name,
            4,
            "header line 4 must start with cellsize",
        ));
    }
    let cellsize: f64 = parse_header_float(&header[4], &file_name, 4)?;

    // Origin, taking care of grid vs pixel registration
    if !header[2].starts_with("xllcorner") {
        return Err(RasterError::format(
            &file_name,
            2,
            "header line 2 must start with xllcorner",
        ));
    }
    let xllcorner = parse_header_float(&header[2], &file_name, 2)? + cellsize / 2.0;

    if !header[3].starts_with("yllcorner") {
        return Err(RasterError::format(
            &file_name,
            3,
            "header line 3 must start with yllcorner",
        ));
    }
    let yllcorner = parse_header_float(&header[3], &file_name, 3)? + cellsize / 2.0;

    if !header[5].starts_with("NODATA") {
        return Err(RasterError::format(
            &file_name,
            5,
            "header line 5 must start with NODATA",
        ));
    }
    let nodata_value = parse_header_float(&header[5], &file_name, 5)?;

    let mut data = Vec::with_capacity(nrows * ncols);
    let mut row_count = 0usize;

    for (i, line) in lines.enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();

        if row_count == nrows {
            return Err(RasterError::format(
                &file_name,
                i,
                format!("expected {} data rows but found more", nrows),
            ));
        }
        if fields.len() != ncols {
            return Err(RasterError::format(
                &file_name,
                i,
                format!(
                    "wrong number of columns: got {} elements, expected {}",
                    fields.len(),
                    ncols
                ),
            ));
        }

        for token in fields {
            let value: f64 = token.parse().map_err(|_| {
                RasterError::format(&file_name, i, format!("invalid value '{}'", token))
            })?;
            data.push(value);
        }
        row_count += 1;
    }

    if row_count != nrows {
        return Err(RasterError::format(
            &file_name,
            row_count,
            format!("expected {} data rows, found {}", nrows, row_count),
        ));
    }

    GridRaster::new(
        nrows, ncols, cellsize, xllcorner, yllcorner, nodata_value, data,
    )
}

/// Write a grid as an ESRI ASCII file plus a sibling `.prj`.
///
/// `xllcorner`/`yllcorner` are written verbatim as the header corner: the
/// caller passes corner-aligned coordinates, no half-cell shift is applied
/// here. Values are formatted to 12 decimal places; NaN cells are written as
/// the integer nodata value. Both files are created or overwritten; an
/// interrupted write leaves a truncated file that readers must treat as
/// corrupt.
pub fn write_grid(
    grid: &GridRaster,
    path: impl AsRef<Path>,
    xllcorner: f64,
    yllcorner: f64,
    options: &WriteOptions,
) -> Result<()> {
    let path = path.as_ref();
    let (nrows, ncols) = grid.shape();
    let nodata_int = options.nodata_value as i64;

    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "ncols         {}", ncols)?;
    writeln!(out, "nrows         {}", nrows)?;
    writeln!(out, "xllcorner     {:.12}", xllcorner)?;
    writeln!(out, "yllcorner     {:.12}", yllcorner)?;
    writeln!(out, "cellsize      {:.12}", options.cellsize)?;
    writeln!(out, "NODATA_value  {}", nodata_int)?;

    let data = grid.data();
    for row in 0..nrows {
        for col in 0..ncols {
            let value = data[row * ncols + col];
            if value.is_nan() {
                write!(out, "{} ", nodata_int)?;
            } else {
                write!(out, "{:.12} ", value)?;
            }
        }
        writeln!(out)?;
    }
    out.flush()?;

    let mut prj = File::create(path.with_extension("prj"))?;
    prj.write_all(options.projection.as_bytes())?;

    Ok(())
}

fn header_value<'a>(line: &'a str, file: &str, index: usize) -> Result<&'a str> {
    line.split_whitespace()
        .nth(1)
        .ok_or_else(|| RasterError::format(file, index, "header line is missing its value"))
}

fn parse_header_float(line: &str, file: &str, index: usize) -> Result<f64> {
    header_value(line, file, index)?
        .parse()
        .map_err(|_| RasterError::format(file, index, "header value is not a number"))
}
