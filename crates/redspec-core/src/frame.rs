use ndarray::Array2;

use crate::error::{RedspecError, Result};

/// A single raw sensor frame.
///
/// Rows are spatial positions along the entrance slit, columns are spectral
/// pixel indices. Values are raw counts below `2^bit_depth`.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (rows, cols)
    pub data: Array2<u16>,
    /// Sensor bit depth (8..=16); counts saturate at `2^bit_depth - 1`.
    pub bit_depth: u8,
}

impl Frame {
    /// Wrap an already-rectangular array. Fails on zero rows or columns.
    pub fn new(data: Array2<u16>, bit_depth: u8) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows == 0 || cols == 0 {
            return Err(RedspecError::EmptyFrame { rows, cols });
        }
        Ok(Self { data, bit_depth })
    }

    /// Build a frame from row slices, validating that every row has the
    /// same length.
    pub fn from_rows(rows: &[Vec<u16>], bit_depth: u8) -> Result<Self> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(RedspecError::EmptyFrame {
                rows: rows.len(),
                cols: rows.first().map_or(0, Vec::len),
            });
        }
        let cols = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(RedspecError::MalformedFrame {
                    row: i,
                    found: row.len(),
                    expected: cols,
                });
            }
        }
        let flat: Vec<u16> = rows.iter().flatten().copied().collect();
        let data = Array2::from_shape_vec((rows.len(), cols), flat)
            .map_err(|_| RedspecError::EmptyFrame {
                rows: rows.len(),
                cols,
            })?;
        Ok(Self { data, bit_depth })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Maximum representable count for this sensor's bit depth.
    pub fn saturation_ceiling(&self) -> u16 {
        if self.bit_depth >= 16 {
            u16::MAX
        } else {
            (1u32 << self.bit_depth) as u16 - 1
        }
    }
}
