use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedspecError {
    #[error("Empty frame: {rows}x{cols}")]
    EmptyFrame { rows: usize, cols: usize },

    #[error("Malformed frame: row {row} has {found} columns, expected {expected}")]
    MalformedFrame {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Insufficient calibration: {found} anchor(s), at least 2 required")]
    InsufficientCalibration { found: usize },

    #[error("Calibration fit is not monotonic over pixels 0..{pixels}")]
    NonMonotonicCalibration { pixels: usize },

    #[error("Singular calibration system (anchors may share a pixel index)")]
    DegenerateCalibration,

    #[error("Signature library contains no signatures")]
    EmptyLibrary,

    #[error("Invalid signature feature for '{signature}': {reason}")]
    InvalidSignature { signature: String, reason: String },
}

pub type Result<T> = std::result::Result<T, RedspecError>;
