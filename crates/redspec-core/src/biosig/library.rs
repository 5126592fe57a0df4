//! Reference library of expected biosignature features.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RedspecError, Result};

/// One expected spectral feature of a signature.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SignatureFeature {
    /// Expected band center, nm.
    pub wavelength_nm: f64,
    /// Half-width of the acceptance window, nm. Match quality decays
    /// linearly to zero at this distance.
    pub tolerance_nm: f64,
    /// Relative weight of this feature within its signature.
    pub weight: f64,
}

impl SignatureFeature {
    pub const fn new(wavelength_nm: f64, tolerance_nm: f64, weight: f64) -> Self {
        Self {
            wavelength_nm,
            tolerance_nm,
            weight,
        }
    }
}

/// Named signatures mapped to their expected features.
///
/// Loaded once at startup and read-only thereafter; a `BTreeMap` keeps
/// iteration order (and therefore report order) deterministic.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureLibrary {
    signatures: BTreeMap<String, Vec<SignatureFeature>>,
}

impl SignatureLibrary {
    /// Build a library from externally supplied definitions, validating
    /// that every signature has at least one sane feature.
    pub fn new<I, S>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<SignatureFeature>)>,
        S: Into<String>,
    {
        let mut signatures = BTreeMap::new();
        for (name, features) in definitions {
            let name = name.into();
            if features.is_empty() {
                return Err(RedspecError::InvalidSignature {
                    signature: name,
                    reason: "no features".into(),
                });
            }
            for f in &features {
                if f.tolerance_nm <= 0.0 || f.weight <= 0.0 || !f.wavelength_nm.is_finite() {
                    return Err(RedspecError::InvalidSignature {
                        signature: name,
                        reason: format!(
                            "feature at {} nm has non-positive tolerance or weight",
                            f.wavelength_nm
                        ),
                    });
                }
            }
            signatures.insert(name, features);
        }
        if signatures.is_empty() {
            return Err(RedspecError::EmptyLibrary);
        }
        Ok(Self { signatures })
    }

    /// Built-in library covering the visible-band pigments the instrument
    /// was fielded for: the chlorophyll Soret and red absorption bands, the
    /// broad carotenoid band, and a generic organic-compound region.
    pub fn builtin() -> Self {
        let defs: [(&str, Vec<SignatureFeature>); 4] = [
            (
                "chlorophyll-a",
                vec![
                    SignatureFeature::new(430.0, 5.0, 1.0),
                    SignatureFeature::new(662.0, 5.0, 1.0),
                ],
            ),
            (
                "chlorophyll-b",
                vec![
                    SignatureFeature::new(453.0, 5.0, 1.0),
                    SignatureFeature::new(642.0, 5.0, 1.0),
                ],
            ),
            ("carotenoid", vec![SignatureFeature::new(500.0, 50.0, 1.0)]),
            (
                "generic-organic",
                vec![SignatureFeature::new(425.0, 25.0, 1.0)],
            ),
        ];
        Self::new(defs).expect("builtin library is valid")
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SignatureFeature])> {
        self.signatures
            .iter()
            .map(|(name, features)| (name.as_str(), features.as_slice()))
    }

    pub fn get(&self, name: &str) -> Option<&[SignatureFeature]> {
        self.signatures.get(name).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_definitions_are_rejected() {
        let defs: Vec<(String, Vec<SignatureFeature>)> = Vec::new();
        assert!(matches!(
            SignatureLibrary::new(defs),
            Err(RedspecError::EmptyLibrary)
        ));
    }

    #[test]
    fn zero_tolerance_is_rejected() {
        let defs = [("bad", vec![SignatureFeature::new(500.0, 0.0, 1.0)])];
        assert!(matches!(
            SignatureLibrary::new(defs),
            Err(RedspecError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn builtin_contains_expected_signatures() {
        let lib = SignatureLibrary::builtin();
        assert!(lib.get("chlorophyll-a").is_some());
        assert!(lib.get("carotenoid").is_some());
        assert!(lib.get("generic-organic").is_some());
    }
}
