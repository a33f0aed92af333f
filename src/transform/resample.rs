//! Resampling of irregular light curves onto a uniform cadence.

use crate::error::{Result, RotationError};

/// Uniform grid `start + i * step` for every `i` with value below `end`.
///
/// The end point is excluded, so the grid has `ceil((end - start) / step)`
/// points.
pub fn uniform_grid(start: f64, end: f64, step: f64) -> Result<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        return Err(RotationError::InvalidParameter(format!(
            "grid step must be positive and finite, got {}",
            step
        )));
    }
    if !(start.is_finite() && end.is_finite()) {
        return Err(RotationError::InvalidParameter(
            "grid bounds must be finite".to_string(),
        ));
    }

    let len = ((end - start) / step).ceil().max(0.0) as usize;
    Ok((0..len).map(|i| start + i as f64 * step).collect())
}

/// Piecewise-linear interpolation of `(x, y)` at each query point.
///
/// `x` must be increasing. Queries outside `[x[0], x[n-1]]` take the value
/// of the nearest end point.
pub fn interpolate_linear(queries: &[f64], x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    if n == 0 {
        return vec![f64::NAN; queries.len()];
    }

    queries
        .iter()
        .map(|&q| {
            if q <= x[0] {
                return y[0];
            }
            if q >= x[n - 1] {
                return y[n - 1];
            }
            // First index with x > q; q lies in [x[hi - 1], x[hi]).
            let hi = x.partition_point(|&xi| xi <= q);
            let lo = hi - 1;
            let frac = (q - x[lo]) / (x[hi] - x[lo]);
            y[lo] + frac * (y[hi] - y[lo])
        })
        .collect()
}

/// Resample `(time, flux)` onto a uniform grid of spacing `cadence`.
///
/// Gaps are bridged by linear interpolation. Returns the new time grid and
/// the interpolated flux, both freshly allocated.
pub fn resample_uniform(time: &[f64], flux: &[f64], cadence: f64) -> Result<(Vec<f64>, Vec<f64>)> {
    crate::core::validate_pair(time, flux)?;
    let grid = uniform_grid(time[0], time[time.len() - 1], cadence)?;
    let values = interpolate_linear(&grid, time, flux);
    Ok((grid, values))
}
