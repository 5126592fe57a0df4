use serde::{Deserialize, Serialize};
use tracing::info;

use crate::biosig::{analyze, BiosignatureReport, SignatureLibrary};
use crate::calibrate::{calibrate, CalibrationMap};
use crate::detect::{detect, Peak};
use crate::error::Result;
use crate::frame::Frame;
use crate::reduce::reduce;
use crate::spectrum::Spectrum;

use super::config::PipelineConfig;

/// Everything one pipeline run produces.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineOutput {
    /// Calibrated spectrum, positions in nm.
    pub spectrum: Spectrum,
    /// Detected peaks, wavelength ascending.
    pub peaks: Vec<Peak>,
    /// Scored biosignature report.
    pub report: BiosignatureReport,
}

/// Run the full reduction -> calibration -> detection -> analysis pipeline
/// on one frame.
///
/// Pure and synchronous; a stage failure aborts this frame's run and
/// propagates unchanged, with no partial output. Independent frames can be
/// processed on separate threads with the same shared `CalibrationMap` and
/// `SignatureLibrary`.
pub fn run_pipeline(
    frame: &Frame,
    calibration: &CalibrationMap,
    config: &PipelineConfig,
    library: &SignatureLibrary,
) -> Result<PipelineOutput> {
    let raw = reduce(frame, &config.reduce)?;
    info!(
        cols = raw.len(),
        mode = %config.reduce,
        "frame reduced"
    );

    let spectrum = calibrate(&raw, calibration)?;
    info!(
        samples = spectrum.len(),
        degree = calibration.degree(),
        "wavelengths calibrated"
    );

    let peaks = detect(&spectrum, &config.peaks);
    info!(peaks = peaks.len(), "peaks detected");

    let report = analyze(&peaks, library)?;
    info!(
        confidence = %report.confidence,
        signatures = report.signatures.len(),
        "biosignature analysis done"
    );

    Ok(PipelineOutput {
        spectrum,
        peaks,
        report,
    })
}
