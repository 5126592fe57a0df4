use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BASELINE_WINDOW, DEFAULT_MIN_PROMINENCE, DEFAULT_MIN_SEPARATION_NM,
    DEFAULT_SMOOTHING_WINDOW,
};

/// Local background estimator used for prominence measurement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BaselineMethod {
    /// Moving minimum: tracks the floor under overlapping peaks.
    #[default]
    MovingMinimum,
    /// Moving median: more robust when noise spikes dip below the floor.
    MovingMedian,
}

impl std::fmt::Display for BaselineMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MovingMinimum => write!(f, "moving minimum"),
            Self::MovingMedian => write!(f, "moving median"),
        }
    }
}

/// Peak detection tuning.
///
/// All thresholds are policy choices, not physical constants; defaults come
/// from `consts` and should be validated against representative calibration
/// data before field use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeakConfig {
    /// Minimum intensity rise above the local baseline to qualify as a peak.
    #[serde(default = "default_min_prominence")]
    pub min_prominence: f64,
    /// Minimum wavelength gap (nm) between accepted peaks; closer candidates
    /// are merged.
    #[serde(default = "default_min_separation_nm")]
    pub min_separation_nm: f64,
    /// Window width (samples) for the local baseline filter. Forced odd.
    #[serde(default = "default_baseline_window")]
    pub baseline_window: usize,
    /// Baseline filter kind.
    #[serde(default)]
    pub baseline_method: BaselineMethod,
    /// Moving-average pre-filter width (samples); 0 or 1 disables smoothing.
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
}

fn default_min_prominence() -> f64 {
    DEFAULT_MIN_PROMINENCE
}
fn default_min_separation_nm() -> f64 {
    DEFAULT_MIN_SEPARATION_NM
}
fn default_baseline_window() -> usize {
    DEFAULT_BASELINE_WINDOW
}
fn default_smoothing_window() -> usize {
    DEFAULT_SMOOTHING_WINDOW
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            min_prominence: DEFAULT_MIN_PROMINENCE,
            min_separation_nm: DEFAULT_MIN_SEPARATION_NM,
            baseline_window: DEFAULT_BASELINE_WINDOW,
            baseline_method: BaselineMethod::default(),
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
        }
    }
}
