mod common;

use approx::assert_relative_eq;
use ndarray::Array2;

use redspec_core::frame::Frame;
use redspec_core::reduce::{reduce, ReduceMode};
use redspec_core::spectrum::PositionUnit;
use redspec_core::RedspecError;

use common::{flat_frame, synthetic_frame, Line};

#[test]
fn output_length_equals_column_count_for_every_mode() {
    let frame = synthetic_frame(24, 320, 100.0, &[Line::new(160.0, 800.0, 12.0)], 12);
    for mode in [
        ReduceMode::Sum,
        ReduceMode::Mean,
        ReduceMode::Max,
        ReduceMode::RoiMean { band_rows: 8 },
    ] {
        let spectrum = reduce(&frame, &mode).unwrap();
        assert_eq!(spectrum.len(), 320, "mode {mode}");
        assert_eq!(spectrum.unit, PositionUnit::Pixel);
    }
}

#[test]
fn mean_of_uniform_rows_matches_single_row() {
    let frame = synthetic_frame(16, 100, 50.0, &[Line::new(50.0, 400.0, 5.0)], 12);
    let mean = reduce(&frame, &ReduceMode::Mean).unwrap();
    let max = reduce(&frame, &ReduceMode::Max).unwrap();
    // Rows are identical, so mean == max per column.
    for (m, x) in mean.intensities.iter().zip(&max.intensities) {
        assert_relative_eq!(m, x, epsilon = 1e-9);
    }
}

#[test]
fn sum_is_rows_times_mean() {
    let frame = flat_frame(10, 40, 7, 12);
    let sum = reduce(&frame, &ReduceMode::Sum).unwrap();
    let mean = reduce(&frame, &ReduceMode::Mean).unwrap();
    for (s, m) in sum.intensities.iter().zip(&mean.intensities) {
        assert_relative_eq!(*s, 10.0 * m, epsilon = 1e-9);
    }
}

#[test]
fn roi_mean_excludes_stray_light_rows() {
    // Signal only in the central band; hot stray rows at the top.
    let mut data = Array2::<u16>::from_elem((32, 64), 100);
    for c in 0..64 {
        data[[0, c]] = 4000; // stray light
        for r in 12..20 {
            data[[r, c]] = 1000; // slit image
        }
    }
    let frame = Frame::new(data, 12).unwrap();

    let roi = reduce(&frame, &ReduceMode::RoiMean { band_rows: 8 }).unwrap();
    assert_relative_eq!(roi.intensities[0], 1000.0, epsilon = 1e-9);

    // Full-column mean is dragged around by the stray row.
    let full = reduce(&frame, &ReduceMode::Mean).unwrap();
    assert!(full.intensities[0] < 1000.0);
}

#[test]
fn roi_band_wider_than_frame_uses_all_rows() {
    let frame = flat_frame(4, 10, 123, 12);
    let roi = reduce(&frame, &ReduceMode::RoiMean { band_rows: 99 }).unwrap();
    assert_relative_eq!(roi.intensities[5], 123.0, epsilon = 1e-9);
}

#[test]
fn saturation_ceiling_scales_with_mode() {
    let frame = flat_frame(10, 10, 100, 12);
    let mean = reduce(&frame, &ReduceMode::Mean).unwrap();
    assert_eq!(mean.saturation_ceiling, Some(4095.0));
    let sum = reduce(&frame, &ReduceMode::Sum).unwrap();
    assert_eq!(sum.saturation_ceiling, Some(40950.0));
}

#[test]
fn ragged_rows_are_rejected() {
    let rows = vec![vec![1, 2, 3], vec![1, 2]];
    let err = Frame::from_rows(&rows, 12).unwrap_err();
    assert!(matches!(
        err,
        RedspecError::MalformedFrame {
            row: 1,
            found: 2,
            expected: 3
        }
    ));
}

#[test]
fn empty_frame_is_rejected() {
    let rows: Vec<Vec<u16>> = Vec::new();
    assert!(matches!(
        Frame::from_rows(&rows, 12).unwrap_err(),
        RedspecError::EmptyFrame { .. }
    ));

    let no_cols = vec![Vec::<u16>::new()];
    assert!(matches!(
        Frame::from_rows(&no_cols, 12).unwrap_err(),
        RedspecError::EmptyFrame { .. }
    ));
}

#[test]
fn positions_are_pixel_indices() {
    let frame = flat_frame(4, 5, 10, 8);
    let spectrum = reduce(&frame, &ReduceMode::default()).unwrap();
    assert_eq!(spectrum.positions, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}
