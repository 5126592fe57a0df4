//! Peak detection over a calibrated spectrum: local maxima above a moving
//! baseline, with parabolic sub-sample center refinement and FWHM walk-out.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::spectrum::Spectrum;

use super::baseline;
use super::config::PeakConfig;

/// A detected spectral feature.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Peak {
    /// Refined center, nm. Always strictly inside the spectrum's range.
    pub wavelength_nm: f64,
    /// Intensity at the refined center.
    pub intensity: f64,
    /// Full width at half maximum, nm.
    pub fwhm_nm: f64,
    /// Intensity rise above the local baseline.
    pub prominence: f64,
    /// True when the center sample sits at the sensor's saturation ceiling;
    /// the true prominence of such a peak is unknown.
    pub saturated: bool,
}

/// Find significant peaks in a calibrated spectrum.
///
/// A flat, empty, or too-short spectrum yields an empty list, never an
/// error. The result is sorted by wavelength ascending with no two peaks
/// closer than `config.min_separation_nm`.
pub fn detect(spectrum: &Spectrum, config: &PeakConfig) -> Vec<Peak> {
    let n = spectrum.len();
    if n < 3 {
        return Vec::new();
    }

    let smoothed = baseline::smooth(&spectrum.intensities, config.smoothing_window);
    let background = baseline::estimate(&smoothed, config.baseline_window, config.baseline_method);

    let mut candidates = Vec::new();
    for i in local_maxima(&smoothed) {
        let prominence = smoothed[i] - background[i];
        if prominence < config.min_prominence {
            continue;
        }
        candidates.push(build_peak(spectrum, &smoothed, &background, i, prominence));
    }

    let merged = merge_close(candidates, config.min_separation_nm);
    debug!(peaks = merged.len(), "peak detection complete");
    merged
}

/// Indices of interior local maxima, treating equal-valued plateaus as a
/// single maximum at the plateau center.
fn local_maxima(values: &[f64]) -> Vec<usize> {
    let n = values.len();
    let mut maxima = Vec::new();
    let mut i = 1;
    while i < n - 1 {
        if values[i] > values[i - 1] {
            // Scan forward across any plateau.
            let start = i;
            let mut end = i;
            while end + 1 < n && values[end + 1] == values[start] {
                end += 1;
            }
            if end + 1 < n && values[end + 1] < values[start] {
                maxima.push((start + end) / 2);
            }
            i = end + 1;
        } else {
            i += 1;
        }
    }
    maxima
}

fn build_peak(
    spectrum: &Spectrum,
    smoothed: &[f64],
    background: &[f64],
    i: usize,
    prominence: f64,
) -> Peak {
    let (center_nm, intensity) = refine_center(&spectrum.positions, smoothed, i);
    let fwhm_nm = walk_fwhm(&spectrum.positions, smoothed, background, i, prominence);

    let saturated = spectrum
        .saturation_ceiling
        .is_some_and(|ceiling| spectrum.intensities[i] >= ceiling - 0.5);

    Peak {
        wavelength_nm: center_nm,
        intensity,
        fwhm_nm,
        prominence,
        saturated,
    }
}

/// Parabolic interpolation through the three samples around the discrete
/// maximum. Returns (center wavelength, interpolated intensity).
fn refine_center(positions: &[f64], values: &[f64], i: usize) -> (f64, f64) {
    let y0 = values[i - 1];
    let y1 = values[i];
    let y2 = values[i + 1];

    let denom = y0 - 2.0 * y1 + y2;
    let delta = if denom.abs() > 1e-12 {
        ((y0 - y2) / (2.0 * denom)).clamp(-0.5, 0.5)
    } else {
        0.0
    };

    // Sample spacing on the side the refinement shifts toward.
    let spacing = if delta >= 0.0 {
        positions[i + 1] - positions[i]
    } else {
        positions[i] - positions[i - 1]
    };
    let center = positions[i] + delta * spacing;
    let intensity = y1 - 0.25 * (y0 - y2) * delta;
    (center, intensity)
}

/// Walk outward from the discrete maximum until intensity falls to half the
/// prominence above baseline, interpolating the crossing positions.
fn walk_fwhm(
    positions: &[f64],
    values: &[f64],
    background: &[f64],
    i: usize,
    prominence: f64,
) -> f64 {
    let half_level = background[i] + prominence / 2.0;

    let left = {
        let mut j = i;
        while j > 0 && values[j] > half_level {
            j -= 1;
        }
        crossing(positions, values, j, j + 1, half_level, positions[0])
    };

    let right = {
        let n = values.len();
        let mut j = i;
        while j < n - 1 && values[j] > half_level {
            j += 1;
        }
        crossing(
            positions,
            values,
            j.saturating_sub(1),
            j,
            half_level,
            positions[n - 1],
        )
    };

    right - left
}

/// Linear interpolation of the half-level crossing between samples `a` and
/// `b`; falls back to `edge` when the signal never drops below the level.
fn crossing(positions: &[f64], values: &[f64], a: usize, b: usize, level: f64, edge: f64) -> f64 {
    let (ya, yb) = (values[a], values[b]);
    let outside = if ya <= level {
        a
    } else if yb <= level {
        b
    } else {
        return edge;
    };
    let inside = if outside == a { b } else { a };
    let (yi, yo) = (values[inside], values[outside]);
    if (yi - yo).abs() < 1e-12 {
        return positions[outside];
    }
    let t = (yi - level) / (yi - yo);
    positions[inside] + t * (positions[outside] - positions[inside])
}

/// Merge candidates closer than `min_separation_nm`, keeping the candidate
/// with higher prominence; on equal prominence the sharper (narrower)
/// feature wins.
fn merge_close(mut candidates: Vec<Peak>, min_separation_nm: f64) -> Vec<Peak> {
    candidates.sort_by(|a, b| a.wavelength_nm.total_cmp(&b.wavelength_nm));

    let mut merged: Vec<Peak> = Vec::with_capacity(candidates.len());
    for peak in candidates {
        match merged.last_mut() {
            Some(last) if peak.wavelength_nm - last.wavelength_nm < min_separation_nm => {
                if wins(&peak, last) {
                    *last = peak;
                }
            }
            _ => merged.push(peak),
        }
    }
    merged
}

fn wins(challenger: &Peak, incumbent: &Peak) -> bool {
    if challenger.prominence != incumbent.prominence {
        challenger.prominence > incumbent.prominence
    } else {
        challenger.fwhm_nm < incumbent.fwhm_nm
    }
}
