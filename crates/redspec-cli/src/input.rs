//! File loading for the CLI: sensor frames, calibration anchors, and
//! signature libraries. The core itself never touches the file system.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::Array2;
use serde::Deserialize;
use tracing::debug;

use redspec_core::biosig::{SignatureFeature, SignatureLibrary};
use redspec_core::calibrate::{CalibrationAnchor, CalibrationMap};
use redspec_core::frame::Frame;

/// Load a frame from a grayscale image (PNG/PGM, 8 or 16 bit) or from a
/// CSV of row-major intensities. Format is chosen by extension.
pub fn load_frame(path: &Path) -> Result<Frame> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let frame = match ext.as_str() {
        "csv" => load_frame_csv(path),
        _ => load_frame_image(path),
    }?;
    debug!(
        rows = frame.rows(),
        cols = frame.cols(),
        bit_depth = frame.bit_depth,
        "frame loaded"
    );
    Ok(frame)
}

fn load_frame_image(path: &Path) -> Result<Frame> {
    let img = image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let (data, bit_depth) = match img {
        image::DynamicImage::ImageLuma8(buf) => {
            let (w, h) = buf.dimensions();
            let pixels: Vec<u16> = buf.pixels().map(|p| p.0[0] as u16).collect();
            (
                Array2::from_shape_vec((h as usize, w as usize), pixels)?,
                8u8,
            )
        }
        other => {
            let buf = other.to_luma16();
            let (w, h) = buf.dimensions();
            let pixels: Vec<u16> = buf.pixels().map(|p| p.0[0]).collect();
            (
                Array2::from_shape_vec((h as usize, w as usize), pixels)?,
                16u8,
            )
        }
    };

    Frame::new(data, bit_depth).map_err(Into::into)
}

fn load_frame_csv(path: &Path) -> Result<Frame> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mut rows: Vec<Vec<u16>> = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split(',')
            .map(|cell| {
                cell.trim()
                    .parse::<u16>()
                    .with_context(|| format!("line {}: bad value '{}'", lineno + 1, cell.trim()))
            })
            .collect::<Result<Vec<u16>>>()?;
        rows.push(row);
    }

    if rows.is_empty() {
        bail!("{}: no data rows", path.display());
    }

    // CSV carries no bit-depth metadata; assume a 16-bit sensor.
    Frame::from_rows(&rows, 16).map_err(Into::into)
}

#[derive(Deserialize)]
struct CalibrationFile {
    anchors: Vec<CalibrationAnchor>,
}

/// Load and fit calibration anchors from a TOML file:
///
/// ```toml
/// [[anchors]]
/// pixel = 0.0
/// wavelength_nm = 400.0
/// ```
pub fn load_calibration(path: &Path) -> Result<CalibrationMap> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file: CalibrationFile =
        toml::from_str(&contents).with_context(|| format!("Invalid calibration file {}", path.display()))?;
    CalibrationMap::fit(&file.anchors).map_err(Into::into)
}

#[derive(Deserialize)]
struct LibraryFile {
    signatures: BTreeMap<String, Vec<SignatureFeature>>,
}

/// Load a signature library from a TOML file:
///
/// ```toml
/// [signatures]
/// "chlorophyll-a" = [{ wavelength_nm = 430.0, tolerance_nm = 5.0, weight = 1.0 }]
/// ```
pub fn load_library(path: &Path) -> Result<SignatureLibrary> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file: LibraryFile =
        toml::from_str(&contents).with_context(|| format!("Invalid library file {}", path.display()))?;
    SignatureLibrary::new(file.signatures).map_err(Into::into)
}
