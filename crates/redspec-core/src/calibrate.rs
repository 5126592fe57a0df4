//! Wavelength calibration: map spectral pixel index to wavelength via a
//! low-order polynomial fit through known (pixel, wavelength) anchors.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    MAX_CALIBRATION_DEGREE, MONOTONICITY_SAMPLES, TRUSTED_BAND_MAX_NM, TRUSTED_BAND_MIN_NM,
};
use crate::error::{RedspecError, Result};
use crate::spectrum::{PositionUnit, Spectrum};

/// A known (pixel, wavelength) correspondence, e.g. from a calibration lamp
/// line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationAnchor {
    pub pixel: f64,
    pub wavelength_nm: f64,
}

/// Fitted pixel-to-wavelength mapping.
///
/// Immutable once fitted; safe for unsynchronized concurrent reads.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalibrationMap {
    anchors: Vec<CalibrationAnchor>,
    /// Polynomial coefficients, lowest order first.
    coefficients: Vec<f64>,
}

impl CalibrationMap {
    /// Least-squares fit through the anchors.
    ///
    /// Degree is chosen from the anchor count: 2 anchors give a linear fit,
    /// 3-4 quadratic, 5 or more cubic. Monotonicity over the anchored pixel
    /// range is verified after fitting; a non-monotonic curve would invert
    /// wavelengths and is rejected.
    pub fn fit(anchors: &[CalibrationAnchor]) -> Result<Self> {
        if anchors.len() < 2 {
            return Err(RedspecError::InsufficientCalibration {
                found: anchors.len(),
            });
        }

        let mut sorted = anchors.to_vec();
        sorted.sort_by(|a, b| a.pixel.total_cmp(&b.pixel));

        let degree = degree_for_anchor_count(sorted.len());
        let coefficients = polyfit(&sorted, degree)?;
        debug!(anchors = sorted.len(), degree, "calibration fitted");

        let map = Self {
            anchors: sorted,
            coefficients,
        };
        let max_pixel = map.anchors.last().map_or(0.0, |a| a.pixel);
        if !map.is_monotonic(max_pixel) {
            return Err(RedspecError::NonMonotonicCalibration {
                pixels: max_pixel.ceil() as usize,
            });
        }
        Ok(map)
    }

    pub fn anchors(&self) -> &[CalibrationAnchor] {
        &self.anchors
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate the fitted polynomial at a pixel position.
    pub fn wavelength_at(&self, pixel: f64) -> f64 {
        // Horner evaluation, highest order first.
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * pixel + c)
    }

    /// Check that the curve is strictly increasing (or strictly decreasing)
    /// across `[0, max_pixel]` by sampling finite differences.
    fn is_monotonic(&self, max_pixel: f64) -> bool {
        if max_pixel <= 0.0 {
            return false;
        }
        let step = max_pixel / MONOTONICITY_SAMPLES as f64;
        let mut sign = 0.0f64;
        for i in 0..MONOTONICITY_SAMPLES {
            let a = self.wavelength_at(i as f64 * step);
            let b = self.wavelength_at((i + 1) as f64 * step);
            let d = b - a;
            if d == 0.0 {
                return false;
            }
            if sign == 0.0 {
                sign = d.signum();
            } else if d.signum() != sign {
                return false;
            }
        }
        true
    }
}

/// Degree selection policy: linear for 2 anchors, quadratic for 3-4, cubic
/// beyond, capped at [`MAX_CALIBRATION_DEGREE`].
fn degree_for_anchor_count(n: usize) -> usize {
    match n {
        0..=2 => 1,
        3..=4 => 2,
        _ => MAX_CALIBRATION_DEGREE,
    }
}

/// Least-squares polynomial fit via normal equations.
///
/// Pixel coordinates are normalized to [-1, 1] before building the
/// Vandermonde matrix for numerical stability; the solved coefficients are
/// mapped back to raw pixel space afterwards.
fn polyfit(anchors: &[CalibrationAnchor], degree: usize) -> Result<Vec<f64>> {
    let n = anchors.len();
    let m = degree + 1;

    let p_min = anchors[0].pixel;
    let p_max = anchors[n - 1].pixel;
    let span = p_max - p_min;
    if span <= 0.0 {
        return Err(RedspecError::DegenerateCalibration);
    }
    let norm = |p: f64| 2.0 * (p - p_min) / span - 1.0;

    // Design matrix rows: [1, x, x^2, ...]
    let mut a = vec![vec![0.0f64; m]; n];
    let mut b = vec![0.0f64; n];
    for (i, anchor) in anchors.iter().enumerate() {
        let x = norm(anchor.pixel);
        let mut term = 1.0;
        for j in 0..m {
            a[i][j] = term;
            term *= x;
        }
        b[i] = anchor.wavelength_nm;
    }

    // Normal equations: (A^T A) c = A^T b
    let mut ata = vec![vec![0.0f64; m]; m];
    let mut atb = vec![0.0f64; m];
    for i in 0..m {
        for j in 0..m {
            for row in a.iter() {
                ata[i][j] += row[i] * row[j];
            }
        }
        for (k, row) in a.iter().enumerate() {
            atb[i] += row[i] * b[k];
        }
    }

    let normalized = solve_linear_system(&mut ata, &mut atb)?;
    Ok(denormalize_coefficients(&normalized, p_min, span))
}

/// Gaussian elimination with partial pivoting on the (small) normal system.
fn solve_linear_system(a: &mut [Vec<f64>], b: &mut [f64]) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if a[pivot][col].abs() < 1e-12 {
            return Err(RedspecError::DegenerateCalibration);
        }
        if pivot != col {
            a.swap(pivot, col);
            b.swap(pivot, col);
        }

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0f64; n];
    for col in (0..n).rev() {
        let mut sum = b[col];
        for k in (col + 1)..n {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }
    Ok(x)
}

/// Expand coefficients fitted on x = 2(p - p_min)/span - 1 back into powers
/// of the raw pixel coordinate p.
fn denormalize_coefficients(coeffs: &[f64], p_min: f64, span: f64) -> Vec<f64> {
    // x = s*p + t with s = 2/span, t = -2*p_min/span - 1
    let s = 2.0 / span;
    let t = -2.0 * p_min / span - 1.0;

    let m = coeffs.len();
    let mut out = vec![0.0f64; m];
    // Accumulate c_j * (s*p + t)^j via binomial expansion.
    for (j, &c) in coeffs.iter().enumerate() {
        let mut binom = 1.0f64;
        for k in 0..=j {
            // binom = C(j, k); term for p^k is C(j,k) * s^k * t^(j-k)
            out[k] += c * binom * s.powi(k as i32) * t.powi((j - k) as i32);
            binom = binom * (j - k) as f64 / (k + 1) as f64;
        }
    }
    out
}

/// Apply a fitted calibration to a raw spectrum.
///
/// Every pixel position is mapped through the polynomial; samples landing
/// outside the trusted band (400-700 nm) are discarded rather than reported
/// at extrapolated wavelengths. Output positions are strictly increasing.
pub fn calibrate(spectrum: &Spectrum, calibration: &CalibrationMap) -> Result<Spectrum> {
    let mut positions = Vec::with_capacity(spectrum.len());
    let mut intensities = Vec::with_capacity(spectrum.len());

    let mut ascending = true;
    if spectrum.len() >= 2 {
        let first = calibration.wavelength_at(spectrum.positions[0]);
        let last = calibration.wavelength_at(spectrum.positions[spectrum.len() - 1]);
        ascending = last > first;
    }

    let pairs: Box<dyn Iterator<Item = (f64, f64)> + '_> = if ascending {
        Box::new(spectrum.samples())
    } else {
        // A decreasing fit still yields a valid spectrum once reversed.
        Box::new(
            spectrum
                .positions
                .iter()
                .copied()
                .zip(spectrum.intensities.iter().copied())
                .rev(),
        )
    };

    for (pixel, intensity) in pairs {
        let wl = calibration.wavelength_at(pixel);
        if !(TRUSTED_BAND_MIN_NM..=TRUSTED_BAND_MAX_NM).contains(&wl) {
            continue;
        }
        if let Some(&prev) = positions.last() {
            if wl <= prev {
                return Err(RedspecError::NonMonotonicCalibration {
                    pixels: spectrum.len(),
                });
            }
        }
        positions.push(wl);
        intensities.push(intensity);
    }

    Ok(Spectrum {
        positions,
        intensities,
        unit: PositionUnit::Nanometers,
        saturation_ceiling: spectrum.saturation_ceiling,
    })
}
