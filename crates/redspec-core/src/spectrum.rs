use serde::{Deserialize, Serialize};

/// What the `positions` axis of a [`Spectrum`] means.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionUnit {
    /// Raw spectral pixel index, pre-calibration.
    Pixel,
    /// Physical wavelength in nanometers, post-calibration.
    Nanometers,
}

impl std::fmt::Display for PositionUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pixel => write!(f, "px"),
            Self::Nanometers => write!(f, "nm"),
        }
    }
}

/// A 1D spectrum: one intensity per strictly increasing position.
///
/// Positions are pixel indices before calibration and wavelengths after.
/// `saturation_ceiling` is the intensity at which the reduced signal clips,
/// in the same units as `intensities`; it travels with the spectrum so the
/// peak detector can flag saturated peaks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Spectrum {
    pub positions: Vec<f64>,
    pub intensities: Vec<f64>,
    pub unit: PositionUnit,
    pub saturation_ceiling: Option<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate (position, intensity) pairs.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.positions
            .iter()
            .copied()
            .zip(self.intensities.iter().copied())
    }

    /// Min-max normalize intensities to [0, 1]. A flat spectrum maps to all
    /// zeros. Used for display scaling; the pipeline itself works on raw
    /// counts.
    pub fn normalized(&self) -> Spectrum {
        let min = self.intensities.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self
            .intensities
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let span = max - min;
        let intensities = if span > 0.0 {
            self.intensities.iter().map(|&v| (v - min) / span).collect()
        } else {
            vec![0.0; self.intensities.len()]
        };
        Spectrum {
            positions: self.positions.clone(),
            intensities,
            unit: self.unit,
            saturation_ceiling: None,
        }
    }
}
