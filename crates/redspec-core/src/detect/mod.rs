pub mod baseline;
pub mod config;
pub mod peaks;

pub use config::{BaselineMethod, PeakConfig};
pub use peaks::{detect, Peak};
