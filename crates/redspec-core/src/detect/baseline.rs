//! Sliding-window filters for background estimation and noise suppression.

use super::config::BaselineMethod;

/// Moving average of `window` samples, clamped at the edges. `window <= 1`
/// returns the input unchanged.
pub fn smooth(values: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || values.len() < 2 {
        return values.to_vec();
    }
    let radius = (window | 1) / 2;
    let n = values.len();
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(n);
            let sum: f64 = values[lo..hi].iter().sum();
            sum / (hi - lo) as f64
        })
        .collect()
}

/// Per-sample local background via a centered moving window.
pub fn estimate(values: &[f64], window: usize, method: BaselineMethod) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let radius = (window.max(3) | 1) / 2;
    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(radius);
            let hi = (i + radius + 1).min(n);
            match method {
                BaselineMethod::MovingMinimum => {
                    values[lo..hi].iter().copied().fold(f64::INFINITY, f64::min)
                }
                BaselineMethod::MovingMedian => median(&values[lo..hi]),
            }
        })
        .collect()
}

fn median(window: &[f64]) -> f64 {
    let mut sorted = window.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
