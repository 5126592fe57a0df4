//! Biosignature scoring: match detected peaks against a signature library.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::DEFAULT_CONFIDENCE_SCORE_THRESHOLD;
use crate::detect::Peak;
use crate::error::{RedspecError, Result};

use super::library::SignatureLibrary;

/// A peak that contributed to a signature's score.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchedFeature {
    /// The library feature's expected center, nm.
    pub expected_nm: f64,
    /// Distance between expected center and the matched peak, nm.
    pub distance_nm: f64,
    /// Linear match quality in [0, 1]: 1 at exact match, 0 at the tolerance
    /// boundary.
    pub quality: f64,
    /// The contributing peak.
    pub peak: Peak,
}

/// Score and evidence for one signature.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignatureScore {
    /// Weight-normalized score in [0, 1].
    pub score: f64,
    /// Peaks that contributed, one entry per matched feature.
    pub matches: Vec<MatchedFeature>,
}

/// Overall confidence grade derived from how many signatures scored above
/// the confidence threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    fn from_indicator_count(count: usize) -> Self {
        match count {
            0 => Self::None,
            1 => Self::Low,
            2 => Self::Medium,
            _ => Self::High,
        }
    }

    fn interpretation(self) -> &'static str {
        match self {
            Self::None => "No biosignatures detected",
            Self::Low => "Weak biosignature detected",
            Self::Medium => "Multiple biosignatures detected",
            Self::High => "Strong biosignature pattern detected",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Terminal artifact of one pipeline run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BiosignatureReport {
    /// Per-signature scores, deterministic iteration order.
    pub signatures: BTreeMap<String, SignatureScore>,
    pub confidence: Confidence,
    pub interpretation: String,
}

/// Score every library signature against the detected peaks.
///
/// Total and deterministic: identical inputs produce a bit-identical
/// report. A signature with no matched features scores 0.0; an empty peak
/// list scores everything 0.0. Two signatures may claim the same physical
/// peak.
pub fn analyze(peaks: &[Peak], library: &SignatureLibrary) -> Result<BiosignatureReport> {
    if library.is_empty() {
        return Err(RedspecError::EmptyLibrary);
    }

    let mut signatures = BTreeMap::new();
    for (name, features) in library.iter() {
        let mut contribution = 0.0;
        let mut total_weight = 0.0;
        let mut matches = Vec::new();

        for feature in features {
            total_weight += feature.weight;
            let Some((peak, distance)) = nearest_within(peaks, feature.wavelength_nm, feature.tolerance_nm)
            else {
                continue;
            };
            let quality = 1.0 - distance / feature.tolerance_nm;
            contribution += feature.weight * quality;
            matches.push(MatchedFeature {
                expected_nm: feature.wavelength_nm,
                distance_nm: distance,
                quality,
                peak: peak.clone(),
            });
        }

        let score = if total_weight > 0.0 {
            contribution / total_weight
        } else {
            0.0
        };
        signatures.insert(name.to_string(), SignatureScore { score, matches });
    }

    let indicators = signatures
        .values()
        .filter(|s| s.score >= DEFAULT_CONFIDENCE_SCORE_THRESHOLD)
        .count();
    let confidence = Confidence::from_indicator_count(indicators);
    debug!(indicators, %confidence, "biosignature analysis complete");

    Ok(BiosignatureReport {
        signatures,
        confidence,
        interpretation: confidence.interpretation().to_string(),
    })
}

/// Nearest peak within `tolerance_nm` of the expected wavelength, with its
/// distance. Ties (equidistant peaks) resolve to the lower wavelength, which
/// comes first in the sorted list.
fn nearest_within(peaks: &[Peak], expected_nm: f64, tolerance_nm: f64) -> Option<(&Peak, f64)> {
    peaks
        .iter()
        .map(|p| (p, (p.wavelength_nm - expected_nm).abs()))
        .filter(|(_, d)| *d <= tolerance_nm)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
