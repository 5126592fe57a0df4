pub mod analyze;
pub mod library;

pub use analyze::{analyze, BiosignatureReport, Confidence, MatchedFeature, SignatureScore};
pub use library::{SignatureFeature, SignatureLibrary};
