//! Statistical utility functions.

use std::cmp::Ordering;

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Root mean square of a slice.
pub fn rms(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    (values.iter().map(|v| v * v).sum::<f64>() / values.len() as f64).sqrt()
}

/// Calculate the median of a slice.
pub fn median(values: &[f64]) -> f64 {
    percentile(values, 50.0)
}

/// The `q`-th percentile (0 to 100) of a slice.
///
/// Interpolates linearly between the two nearest order statistics, at
/// fractional rank `q/100 * (n - 1)`.
///
/// # Example
/// ```
/// use gprot::utils::percentile;
///
/// let p = percentile(&[4.0, 1.0, 3.0, 2.0, 5.0], 95.0);
/// assert!((p - 4.8).abs() < 1e-12);
/// ```
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() || !(0.0..=100.0).contains(&q) {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = rank - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// The element of `values` closest to `target` (first one on ties).
///
/// Returns `None` for an empty slice.
pub fn find_nearest(values: &[f64], target: f64) -> Option<f64> {
    values
        .iter()
        .copied()
        .min_by(|a, b| {
            (a - target)
                .abs()
                .partial_cmp(&(b - target).abs())
                .unwrap_or(Ordering::Equal)
        })
}
