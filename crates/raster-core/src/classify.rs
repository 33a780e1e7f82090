//! Extrema and classification boundaries for choropleth styling.

use crate::error::{RasterError, Result};
use crate::grid::GridRaster;

/// How the value range is partitioned into bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinMode {
    /// Equal-width intervals between min and max.
    Equidistant,
    /// Intervals holding roughly equal numbers of cells.
    Quantile,
}

impl GridRaster {
    /// Minimum and maximum over the nodata-as-NaN view, ignoring NaN.
    ///
    /// Fails with `DegenerateInput` when every cell is nodata.
    pub fn extrema(&self) -> Result<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut seen = false;

        for v in self.data_with_nan() {
            if v.is_nan() {
                continue;
            }
            seen = true;
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }

        if !seen {
            return Err(RasterError::degenerate(
                "cannot compute extrema: every cell is nodata",
            ));
        }
        Ok((min, max))
    }

    /// Classification boundaries: `n + 1` non-decreasing values where the
    /// first is the data minimum and the last is the data maximum.
    ///
    /// Equidistant mode places boundary `i` at `min + i*(max-min)/n`; the
    /// final boundary is forced to the true maximum rather than recomputed,
    /// so the last bin always contains the maximum despite rounding.
    ///
    /// Quantile mode sorts the valid cells ascending into `A` (length `L`)
    /// and places boundary `i` at `A[floor(i*(L+0.5)/n)]`. The index formula
    /// is a close-enough approximation, not interpolated order statistics.
    ///
    /// Duplicate boundaries from tied values are tolerated. Fails when
    /// `n == 0` or when fewer than `n` cells carry data.
    pub fn bins(&self, n: usize, mode: BinMode) -> Result<Vec<f64>> {
        if n == 0 {
            return Err(RasterError::degenerate("bin count must be positive"));
        }

        let (min, max) = self.extrema()?;
        let mut levels = Vec::with_capacity(n + 1);

        match mode {
            BinMode::Equidistant => {
                let d = (max - min) / n as f64;
                for i in 0..n {
                    levels.push(min + i as f64 * d);
                }
            }
            BinMode::Quantile => {
                let mut a: Vec<f64> = self
                    .data_with_nan()
                    .into_iter()
                    .filter(|v| !v.is_nan())
                    .collect();
                if a.len() < n {
                    return Err(RasterError::degenerate(format!(
                        "{} valid cells cannot fill {} quantile bins",
                        a.len(),
                        n
                    )));
                }
                a.sort_by(f64::total_cmp);

                let d = (a.len() as f64 + 0.5) / n as f64;
                for i in 0..n {
                    levels.push(a[(i as f64 * d) as usize]);
                }
            }
        }

        levels.push(max);
        Ok(levels)
    }
}
