#![allow(dead_code)]

use ndarray::Array2;

use redspec_core::calibrate::CalibrationAnchor;
use redspec_core::frame::Frame;
use redspec_core::spectrum::{PositionUnit, Spectrum};

/// An injected Gaussian emission line, in pixel coordinates.
pub struct Line {
    pub center_px: f64,
    pub height: f64,
    pub sigma_px: f64,
}

impl Line {
    pub fn new(center_px: f64, height: f64, sigma_px: f64) -> Self {
        Self {
            center_px,
            height,
            sigma_px,
        }
    }
}

/// Build a synthetic frame: a flat dark level plus Gaussian emission lines,
/// uniform along the slit (every row identical), clipped to the sensor
/// ceiling.
pub fn synthetic_frame(rows: usize, cols: usize, dark: f64, lines: &[Line], bit_depth: u8) -> Frame {
    let ceiling = if bit_depth >= 16 {
        u16::MAX as f64
    } else {
        (1u32 << bit_depth) as f64 - 1.0
    };

    let profile: Vec<u16> = (0..cols)
        .map(|col| {
            let mut v = dark;
            for line in lines {
                let d = col as f64 - line.center_px;
                v += line.height * (-d * d / (2.0 * line.sigma_px * line.sigma_px)).exp();
            }
            v.round().clamp(0.0, ceiling) as u16
        })
        .collect();

    let mut data = Array2::<u16>::zeros((rows, cols));
    for r in 0..rows {
        for c in 0..cols {
            data[[r, c]] = profile[c];
        }
    }
    Frame::new(data, bit_depth).expect("synthetic frame is valid")
}

/// Frame with every pixel at the same value.
pub fn flat_frame(rows: usize, cols: usize, value: u16, bit_depth: u8) -> Frame {
    Frame::new(Array2::from_elem((rows, cols), value), bit_depth).expect("flat frame is valid")
}

/// Linear anchors spanning pixels [0, 1280] onto 400-700 nm, so pixel 640
/// maps to exactly 550 nm.
pub fn visible_band_anchors() -> Vec<CalibrationAnchor> {
    vec![
        CalibrationAnchor {
            pixel: 0.0,
            wavelength_nm: 400.0,
        },
        CalibrationAnchor {
            pixel: 1280.0,
            wavelength_nm: 700.0,
        },
    ]
}

/// Build a calibrated spectrum directly from a wavelength grid and a set of
/// Gaussian features, bypassing reduction and calibration.
pub fn calibrated_spectrum(
    start_nm: f64,
    step_nm: f64,
    samples: usize,
    dark: f64,
    features: &[(f64, f64, f64)], // (center_nm, height, sigma_nm)
) -> Spectrum {
    let positions: Vec<f64> = (0..samples).map(|i| start_nm + i as f64 * step_nm).collect();
    let intensities = positions
        .iter()
        .map(|&wl| {
            let mut v = dark;
            for &(center, height, sigma) in features {
                let d = wl - center;
                v += height * (-d * d / (2.0 * sigma * sigma)).exp();
            }
            v
        })
        .collect();
    Spectrum {
        positions,
        intensities,
        unit: PositionUnit::Nanometers,
        saturation_ceiling: None,
    }
}
