//! Starting values for the Gaussian-process rotation model.
//!
//! The GP posterior is sampled by an external MCMC collaborator. This module
//! turns an ACF period into what that sampler needs: a log-parameter
//! starting vector, a log-period prior window, and a subsampling stride that
//! keeps a fixed number of points per rotation.

use crate::core::LightCurve;
use crate::error::{Result, RotationError};

/// Configuration for GP initialisation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpInitConfig {
    /// Fractional half-width of the period prior window.
    pub tolerance: f64,
    /// Target number of retained samples per rotation period.
    pub points_per_period: f64,
    /// Native samples per time unit of the light curve.
    pub samples_per_day: f64,
    /// Periods below this are treated as unphysical.
    pub min_period: f64,
    /// Period used in place of an unphysical or missing one.
    pub fallback_period: f64,
    /// Log starting values of the kernel hyperparameters preceding the period
    /// (amplitude, length scale, gamma, white noise).
    pub log_hyperparameters: [f64; 4],
}

impl Default for GpInitConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.4,
            points_per_period: 50.0,
            samples_per_day: 48.0,
            min_period: 0.5,
            fallback_period: 1.0,
            log_hyperparameters: [-5.0, 7.0, 0.6, -16.0],
        }
    }
}

impl GpInitConfig {
    /// Set the period prior tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the number of retained samples per period.
    pub fn with_points_per_period(mut self, points: f64) -> Self {
        self.points_per_period = points;
        self
    }
}

/// Starting point handed to the GP sampler.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GpInitialisation {
    /// Period the initialisation is built around.
    pub period: f64,
    /// `[ln A, ln l, ln Γ, ln σ, ln P]`.
    pub log_theta: [f64; 5],
    /// `(ln(P(1 - tol)), ln(P(1 + tol)))`.
    pub log_period_bounds: (f64, f64),
    /// Keep every `subsample_stride`-th observation.
    pub subsample_stride: usize,
}

impl GpInitialisation {
    /// Thin a light curve by the computed stride.
    pub fn subsample(&self, curve: &LightCurve) -> Result<LightCurve> {
        curve.subsample(self.subsample_stride)
    }

    /// True if `period` lies inside the prior window.
    pub fn period_in_prior(&self, period: f64) -> bool {
        let lp = period.ln();
        lp >= self.log_period_bounds.0 && lp <= self.log_period_bounds.1
    }
}

/// Build the GP starting point from an ACF period.
///
/// A missing, non-finite, or unphysically short period is replaced by
/// `fallback_period`.
///
/// # Errors
/// [`RotationError::InvalidParameter`] if `tolerance` is outside `(0, 1)` or
/// the sampling settings are not positive.
pub fn gp_initialisation(acf_period: Option<f64>, config: &GpInitConfig) -> Result<GpInitialisation> {
    if !(config.tolerance > 0.0 && config.tolerance < 1.0) {
        return Err(RotationError::InvalidParameter(format!(
            "tolerance must lie in (0, 1), got {}",
            config.tolerance
        )));
    }
    if !(config.points_per_period > 0.0 && config.samples_per_day > 0.0) {
        return Err(RotationError::InvalidParameter(
            "sampling settings must be positive".to_string(),
        ));
    }
    if !(config.fallback_period.is_finite() && config.fallback_period > 0.0) {
        return Err(RotationError::InvalidParameter(format!(
            "fallback period must be positive, got {}",
            config.fallback_period
        )));
    }

    let period = match acf_period {
        Some(p) if p.is_finite() && p >= config.min_period => p,
        _ => config.fallback_period,
    };

    let [a, l, g, s] = config.log_hyperparameters;
    let stride = (period / config.points_per_period * config.samples_per_day).floor() as usize;

    Ok(GpInitialisation {
        period,
        log_theta: [a, l, g, s, period.ln()],
        log_period_bounds: (
            (period * (1.0 - config.tolerance)).ln(),
            (period * (1.0 + config.tolerance)).ln(),
        ),
        subsample_stride: stride.max(1),
    })
}
