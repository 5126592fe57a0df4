mod common;

use redspec_core::biosig::{Confidence, SignatureFeature, SignatureLibrary};
use redspec_core::calibrate::CalibrationMap;
use redspec_core::detect::{BaselineMethod, PeakConfig};
use redspec_core::pipeline::{run_pipeline, PipelineConfig};
use redspec_core::reduce::ReduceMode;
use redspec_core::spectrum::PositionUnit;

use common::{flat_frame, synthetic_frame, visible_band_anchors, Line};

fn pipeline_config() -> PipelineConfig {
    PipelineConfig {
        reduce: ReduceMode::RoiMean { band_rows: 16 },
        peaks: PeakConfig {
            min_prominence: 50.0,
            min_separation_nm: 2.0,
            baseline_window: 51,
            baseline_method: BaselineMethod::MovingMinimum,
            smoothing_window: 5,
        },
    }
}

#[test]
fn single_emission_line_lands_within_one_nanometer() {
    // One line at pixel 640; linear anchors map it to 550 nm.
    let frame = synthetic_frame(64, 1281, 100.0, &[Line::new(640.0, 1500.0, 10.0)], 12);
    let calibration = CalibrationMap::fit(&visible_band_anchors()).unwrap();
    let library = SignatureLibrary::builtin();

    let output = run_pipeline(&frame, &calibration, &pipeline_config(), &library).unwrap();

    assert_eq!(output.spectrum.unit, PositionUnit::Nanometers);
    assert_eq!(output.peaks.len(), 1);
    let center = output.peaks[0].wavelength_nm;
    assert!((center - 550.0).abs() < 1.0, "center = {center}");
}

#[test]
fn injected_lines_are_recovered_within_one_nanometer() {
    let lines = [
        Line::new(213.0, 800.0, 8.0),  // ~450 nm
        Line::new(640.0, 1200.0, 8.0), // 550 nm
        Line::new(1110.0, 600.0, 8.0), // ~660 nm
    ];
    let frame = synthetic_frame(64, 1281, 100.0, &lines, 12);
    let calibration = CalibrationMap::fit(&visible_band_anchors()).unwrap();
    let library = SignatureLibrary::builtin();

    let output = run_pipeline(&frame, &calibration, &pipeline_config(), &library).unwrap();

    assert_eq!(output.peaks.len(), lines.len());
    for (peak, line) in output.peaks.iter().zip(&lines) {
        let expected_nm = 400.0 + line.center_px * 300.0 / 1280.0;
        assert!(
            (peak.wavelength_nm - expected_nm).abs() < 1.0,
            "expected ~{expected_nm}, got {}",
            peak.wavelength_nm
        );
    }
}

#[test]
fn all_zero_frame_yields_empty_peaks_and_zero_scores() {
    let frame = flat_frame(32, 1281, 0, 12);
    let calibration = CalibrationMap::fit(&visible_band_anchors()).unwrap();
    let library = SignatureLibrary::builtin();

    let output = run_pipeline(&frame, &calibration, &pipeline_config(), &library).unwrap();

    assert!(output.peaks.is_empty());
    for sig in output.report.signatures.values() {
        assert_eq!(sig.score, 0.0);
    }
    assert_eq!(output.report.confidence, Confidence::None);
}

#[test]
fn chlorophyll_line_is_scored_in_the_report() {
    // Pixel 1117.7 maps to ~662 nm, the chlorophyll-a red band.
    let frame = synthetic_frame(64, 1281, 100.0, &[Line::new(1118.0, 1500.0, 9.0)], 12);
    let calibration = CalibrationMap::fit(&visible_band_anchors()).unwrap();
    let library = SignatureLibrary::builtin();

    let output = run_pipeline(&frame, &calibration, &pipeline_config(), &library).unwrap();

    let score = output.report.signatures["chlorophyll-a"].score;
    assert!(score > 0.4, "score = {score}");
    assert!(!output.report.signatures["chlorophyll-a"]
        .matches
        .is_empty());
}

#[test]
fn output_serializes_to_plain_structured_json() {
    let frame = synthetic_frame(32, 1281, 100.0, &[Line::new(640.0, 1000.0, 10.0)], 12);
    let calibration = CalibrationMap::fit(&visible_band_anchors()).unwrap();
    let library = SignatureLibrary::builtin();

    let output = run_pipeline(&frame, &calibration, &pipeline_config(), &library).unwrap();
    let json = serde_json::to_value(&output).unwrap();

    assert!(json["spectrum"]["positions"].is_array());
    assert!(json["peaks"].is_array());
    assert!(json["report"]["signatures"].is_object());
}

#[test]
fn custom_library_flows_through_the_pipeline() {
    let frame = synthetic_frame(32, 1281, 100.0, &[Line::new(640.0, 1500.0, 10.0)], 12);
    let calibration = CalibrationMap::fit(&visible_band_anchors()).unwrap();
    let library = SignatureLibrary::new([(
        "test-band",
        vec![SignatureFeature::new(550.0, 5.0, 1.0)],
    )])
    .unwrap();

    let output = run_pipeline(&frame, &calibration, &pipeline_config(), &library).unwrap();
    assert!(output.report.signatures["test-band"].score > 0.8);
    assert_eq!(output.report.confidence, Confidence::Low);
}
