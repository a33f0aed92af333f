//! Ordinary Least Squares (OLS) straight-line fits.
//!
//! Used to remove slow linear drifts from light curves before the
//! autocorrelation step.

use crate::core::validate_pair;
use crate::error::{Result, RotationError};

/// Centered `Σ(x - x̄)²` at or below `n · x̄² · SINGULAR_TOLERANCE` is
/// treated as a constant time axis.
const SINGULAR_TOLERANCE: f64 = f64::EPSILON;

/// Slope and intercept of a fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LineFit {
    /// Evaluate the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Residuals `y - (slope * x + intercept)` as a new vector.
    pub fn residuals(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(y.iter())
            .map(|(&xi, &yi)| yi - self.predict(xi))
            .collect()
    }
}

/// Fit `y = slope * x + intercept` by least squares.
///
/// The time axis is centered on its mean before the 2x2 normal equations
/// are formed, so absolute timestamps (Julian dates around 2.45e6) keep
/// full slope precision:
///
/// ```text
/// slope     = Σ(x - x̄)(y - ȳ) / Σ(x - x̄)²
/// intercept = ȳ - slope · x̄
/// ```
///
/// # Errors
/// * [`RotationError::EmptyData`] / [`RotationError::DimensionMismatch`] for bad input
/// * [`RotationError::DegenerateInput`] when `x` is constant to working
///   precision (fewer than two distinct values)
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit> {
    validate_pair(x, y)?;

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - x_mean;
        sxx += dx * dx;
        sxy += dx * (yi - y_mean);
    }

    if !sxx.is_finite() || sxx <= SINGULAR_TOLERANCE * n * x_mean * x_mean {
        return Err(RotationError::DegenerateInput(format!(
            "time axis has no spread in line fit (Σ(x - x̄)² = {:e}, n = {})",
            sxx,
            x.len()
        )));
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    Ok(LineFit { slope, intercept })
}

/// Subtract the least-squares line from `y`, returning the residuals
/// together with the fitted line.
pub fn detrend_linear(x: &[f64], y: &[f64]) -> Result<(Vec<f64>, LineFit)> {
    let fit = fit_line(x, y)?;
    Ok((fit.residuals(x, y), fit))
}
