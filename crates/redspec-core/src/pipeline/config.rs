use serde::{Deserialize, Serialize};

use crate::detect::PeakConfig;
use crate::reduce::ReduceMode;

/// Immutable per-invocation pipeline settings.
///
/// Passed by reference into every run; concurrent invocations with
/// different settings cannot interfere.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub reduce: ReduceMode,
    #[serde(default)]
    pub peaks: PeakConfig,
}
