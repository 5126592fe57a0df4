//! Frame reduction: collapse a 2D sensor frame into a 1D raw spectrum,
//! one intensity per spectral column.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ROI_BAND_ROWS, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{RedspecError, Result};
use crate::frame::Frame;
use crate::spectrum::{PositionUnit, Spectrum};

/// Column-collapse strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ReduceMode {
    /// Sum of all rows per column.
    Sum,
    /// Arithmetic mean of all rows per column.
    Mean,
    /// Brightest row value per column.
    Max,
    /// Mean over a horizontal band of `band_rows` rows centered on the
    /// middle row. The slit image occupies a narrow strip; full-column
    /// statistics pick up stray-light rows.
    RoiMean { band_rows: usize },
}

impl Default for ReduceMode {
    fn default() -> Self {
        Self::RoiMean {
            band_rows: DEFAULT_ROI_BAND_ROWS,
        }
    }
}

impl std::fmt::Display for ReduceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sum => write!(f, "sum"),
            Self::Mean => write!(f, "mean"),
            Self::Max => write!(f, "max"),
            Self::RoiMean { band_rows } => write!(f, "roi-mean ({band_rows} rows)"),
        }
    }
}

/// Collapse a frame into a raw spectrum indexed by pixel column.
///
/// Pure function of its inputs; the output length equals the frame's column
/// count. The spectrum carries a saturation ceiling in output units so later
/// stages can recognize clipped peaks.
pub fn reduce(frame: &Frame, mode: &ReduceMode) -> Result<Spectrum> {
    let (rows, cols) = frame.data.dim();
    if rows == 0 || cols == 0 {
        return Err(RedspecError::EmptyFrame { rows, cols });
    }
    let (row_start, row_end) = match mode {
        ReduceMode::RoiMean { band_rows } => roi_band(rows, *band_rows),
        _ => (0, rows),
    };

    let collapse = |col: usize| -> f64 {
        match mode {
            ReduceMode::Sum => (0..rows).map(|r| frame.data[[r, col]] as f64).sum(),
            ReduceMode::Mean => {
                let sum: f64 = (0..rows).map(|r| frame.data[[r, col]] as f64).sum();
                sum / rows as f64
            }
            ReduceMode::Max => (0..rows)
                .map(|r| frame.data[[r, col]] as f64)
                .fold(0.0, f64::max),
            ReduceMode::RoiMean { .. } => {
                let band = row_end - row_start;
                let sum: f64 = (row_start..row_end)
                    .map(|r| frame.data[[r, col]] as f64)
                    .sum();
                sum / band as f64
            }
        }
    };

    let intensities: Vec<f64> = if rows * cols >= PARALLEL_PIXEL_THRESHOLD {
        (0..cols).into_par_iter().map(collapse).collect()
    } else {
        (0..cols).map(collapse).collect()
    };

    let ceiling = frame.saturation_ceiling() as f64;
    let saturation_ceiling = match mode {
        ReduceMode::Sum => ceiling * rows as f64,
        _ => ceiling,
    };

    Ok(Spectrum {
        positions: (0..cols).map(|c| c as f64).collect(),
        intensities,
        unit: PositionUnit::Pixel,
        saturation_ceiling: Some(saturation_ceiling),
    })
}

/// Row band `[start, end)` of `band_rows` rows centered on the middle row,
/// clamped to the frame. Always at least one row.
fn roi_band(rows: usize, band_rows: usize) -> (usize, usize) {
    let band = band_rows.clamp(1, rows);
    let center = rows / 2;
    let half = band / 2;
    let start = center.saturating_sub(half);
    let end = (start + band).min(rows);
    (end - band, end)
}
