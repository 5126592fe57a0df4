/// Minimum pixel count (rows * cols) to use row-level Rayon parallelism
/// during frame reduction.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Lower edge of the sensor's trusted wavelength band (nm). Calibrated
/// samples below this are discarded rather than extrapolated.
pub const TRUSTED_BAND_MIN_NM: f64 = 400.0;

/// Upper edge of the sensor's trusted wavelength band (nm).
pub const TRUSTED_BAND_MAX_NM: f64 = 700.0;

/// Highest polynomial degree used for wavelength calibration. Capped at
/// cubic to avoid oscillation at the spectrum edges.
pub const MAX_CALIBRATION_DEGREE: usize = 3;

/// Number of evenly spaced pixel positions sampled when checking that a
/// fitted calibration curve is monotonic.
pub const MONOTONICITY_SAMPLES: usize = 256;

/// Default ROI band height (rows) for `ReduceMode::RoiMean`.
pub const DEFAULT_ROI_BAND_ROWS: usize = 32;

/// Default minimum peak prominence above the local baseline.
pub const DEFAULT_MIN_PROMINENCE: f64 = 50.0;

/// Default minimum wavelength gap (nm) between accepted peaks.
pub const DEFAULT_MIN_SEPARATION_NM: f64 = 2.0;

/// Default window width (samples) for local baseline estimation.
pub const DEFAULT_BASELINE_WINDOW: usize = 51;

/// Default moving-average pre-filter width (samples). 1 disables smoothing.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Default per-signature score above which a signature counts toward the
/// report's overall confidence grade.
pub const DEFAULT_CONFIDENCE_SCORE_THRESHOLD: f64 = 0.5;
