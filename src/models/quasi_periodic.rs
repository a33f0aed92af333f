//! Quasi-periodic model fit to a smoothed autocorrelation curve.
//!
//! The model borrows the shape of the quasi-periodic covariance kernel as a
//! curve template:
//!
//! ```text
//! raw(τ) = A² · exp(-τ²/(2l²) - G²·sin²(πτ/P)) + m·τ
//! f(τ)   = raw(τ) / raw(0) · s + c
//! ```
//!
//! so the curve starts at `s + c`, oscillates with period `P`, and decays
//! on the length scale `l`. Fitting it to an ACF confirms the period and
//! characterises how coherent the rotational signal is.

use log::{debug, warn};

use crate::core::validate_pair;
use crate::detection::{power_spectrum, AcfResult};
use crate::error::{Result, RotationError};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};

/// Number of free parameters in the quasi-periodic model.
pub const QP_DIM: usize = 7;

/// Parameters of the quasi-periodic model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QpParams {
    /// Amplitude scale `A`.
    pub amplitude: f64,
    /// Gaussian decay length `l`.
    pub decay_length: f64,
    /// Periodic sharpness `G`.
    pub sharpness: f64,
    /// Period `P`.
    pub period: f64,
    /// Linear trend slope `m`.
    pub slope: f64,
    /// Output scale `s`.
    pub scale: f64,
    /// Output offset `c`.
    pub offset: f64,
}

impl Default for QpParams {
    /// Literature starting values for a Kepler-like rotator.
    fn default() -> Self {
        Self {
            amplitude: 1f64.exp(),
            decay_length: 10f64.exp(),
            sharpness: 0.1f64.exp(),
            period: 19.514,
            slope: -0.07,
            scale: 0.5,
            offset: 0.55,
        }
    }
}

impl QpParams {
    /// Parameters in `[A, l, G, P, m, s, c]` order.
    pub fn to_array(&self) -> [f64; QP_DIM] {
        [
            self.amplitude,
            self.decay_length,
            self.sharpness,
            self.period,
            self.slope,
            self.scale,
            self.offset,
        ]
    }

    /// Build from a `[A, l, G, P, m, s, c]` slice.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() != QP_DIM {
            return Err(RotationError::DimensionMismatch {
                expected: QP_DIM,
                got: values.len(),
            });
        }
        Ok(Self::from_array_unchecked(values))
    }

    fn from_array_unchecked(v: &[f64]) -> Self {
        Self {
            amplitude: v[0],
            decay_length: v[1],
            sharpness: v[2],
            period: v[3],
            slope: v[4],
            scale: v[5],
            offset: v[6],
        }
    }

    /// Unnormalised model value `raw(τ)`.
    fn raw(&self, lag: f64) -> f64 {
        let phase = (std::f64::consts::PI * lag / self.period).sin();
        let exponent = -lag * lag / (2.0 * self.decay_length * self.decay_length)
            - self.sharpness * self.sharpness * phase * phase;
        self.amplitude * self.amplitude * exponent.exp() + self.slope * lag
    }

    /// Model value at a single lag.
    pub fn evaluate(&self, lag: f64) -> f64 {
        // raw(0) = A²
        let norm = self.amplitude * self.amplitude;
        self.raw(lag) / norm * self.scale + self.offset
    }
}

/// Evaluate the quasi-periodic model at every lag.
pub fn qp_model(params: &QpParams, lags: &[f64]) -> Vec<f64> {
    lags.iter().map(|&lag| params.evaluate(lag)).collect()
}

/// Gaussian log-likelihood `-0.5 · Σ (acf - model)²` with unit variance.
pub fn log_likelihood(params: &QpParams, lags: &[f64], acf: &[f64]) -> f64 {
    -0.5 * lags
        .iter()
        .zip(acf.iter())
        .map(|(&lag, &y)| (y - params.evaluate(lag)).powi(2))
        .sum::<f64>()
}

/// Objective minimised by [`fit_qp`]; `+inf` where the model is undefined.
pub fn neg_log_likelihood(params: &QpParams, lags: &[f64], acf: &[f64]) -> f64 {
    let nll = -log_likelihood(params, lags, acf);
    if nll.is_finite() {
        nll
    } else {
        f64::INFINITY
    }
}

/// Configuration for the quasi-periodic fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QpFitConfig {
    /// Starting parameters.
    pub initial: QpParams,
    /// Optional `(min, max)` bounds in `[A, l, G, P, m, s, c]` order.
    pub bounds: Option<Vec<(f64, f64)>>,
    /// Optimizer settings.
    pub optimizer: NelderMeadConfig,
}

impl Default for QpFitConfig {
    fn default() -> Self {
        Self {
            initial: QpParams::default(),
            bounds: None,
            optimizer: NelderMeadConfig::default(),
        }
    }
}

impl QpFitConfig {
    /// Set the starting parameters.
    pub fn with_initial(mut self, initial: QpParams) -> Self {
        self.initial = initial;
        self
    }

    /// Replace only the starting period.
    pub fn with_period_guess(mut self, period: f64) -> Self {
        self.initial.period = period;
        self
    }

    /// Set per-parameter bounds.
    pub fn with_bounds(mut self, bounds: Vec<(f64, f64)>) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set optimizer settings.
    pub fn with_optimizer(mut self, optimizer: NelderMeadConfig) -> Self {
        self.optimizer = optimizer;
        self
    }
}

/// Outcome of a quasi-periodic fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QpFit {
    /// Best parameters found.
    pub params: QpParams,
    /// Objective value at `params`.
    pub neg_log_likelihood: f64,
    /// Optimizer iterations used.
    pub iterations: usize,
    /// Whether the optimizer met its convergence criterion.
    pub converged: bool,
}

impl QpFit {
    /// Fitted model evaluated at `lags`.
    pub fn model(&self, lags: &[f64]) -> Vec<f64> {
        qp_model(&self.params, lags)
    }
}

/// Fit the quasi-periodic model to an ACF curve.
///
/// The fit is best effort: a run that hits the iteration cap still returns
/// the best parameters seen, with `converged == false`.
///
/// # Errors
/// * [`RotationError::EmptyData`] / [`RotationError::DimensionMismatch`] for bad input
/// * [`RotationError::NonFiniteValue`] for NaN or infinite samples
/// * [`RotationError::InvalidParameter`] for malformed bounds
pub fn fit_qp(lags: &[f64], acf: &[f64], config: &QpFitConfig) -> Result<QpFit> {
    validate_pair(lags, acf)?;
    if let Some(index) = lags
        .iter()
        .zip(acf.iter())
        .position(|(l, a)| !l.is_finite() || !a.is_finite())
    {
        return Err(RotationError::NonFiniteValue { index });
    }
    if let Some(bounds) = &config.bounds {
        if bounds.len() != QP_DIM {
            return Err(RotationError::InvalidParameter(format!(
                "expected {} bounds, got {}",
                QP_DIM,
                bounds.len()
            )));
        }
        if let Some(i) = bounds.iter().position(|(lo, hi)| !(lo <= hi)) {
            return Err(RotationError::InvalidParameter(format!(
                "bound {} has min above max",
                i
            )));
        }
    }

    let result = nelder_mead(
        |x| neg_log_likelihood(&QpParams::from_array_unchecked(x), lags, acf),
        &config.initial.to_array(),
        config.bounds.as_deref(),
        &config.optimizer,
    );

    let params = QpParams::from_slice(&result.optimal_point)?;
    if result.converged {
        debug!(
            "QP fit converged after {} iterations: period {:.4}, nll {:e}",
            result.iterations, params.period, result.optimal_value
        );
    } else {
        warn!(
            "QP fit did not converge in {} iterations (period {:.4}, nll {:e})",
            result.iterations, params.period, result.optimal_value
        );
    }

    Ok(QpFit {
        params,
        neg_log_likelihood: result.optimal_value,
        iterations: result.iterations,
        converged: result.converged,
    })
}

/// Fit the quasi-periodic model to an ACF estimate, starting the period at
/// the detected value when there is one.
pub fn fit_qp_to_acf(acf: &AcfResult, config: &QpFitConfig) -> Result<QpFit> {
    let config = match acf.period {
        Some(p) => config.clone().with_period_guess(p),
        None => config.clone(),
    };
    fit_qp(&acf.lags, &acf.acf, &config)
}

/// Power spectrum `|FFT(acf)|²` of an ACF curve for frequency indices
/// `0..=n/2`.
///
/// Index `k` corresponds to frequency `k / (n · Δτ)` for lag spacing `Δτ`.
/// A clean rotator shows a single dominant line at `n · Δτ / P`.
pub fn acf_power_spectrum(acf: &[f64]) -> Vec<f64> {
    power_spectrum(acf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lag_grid(n: usize, step: f64) -> Vec<f64> {
        (1..=n).map(|i| i as f64 * step).collect()
    }

    fn truth() -> QpParams {
        QpParams {
            amplitude: 1.5,
            decay_length: 40.0,
            sharpness: 1.2,
            period: 20.0,
            slope: -0.002,
            scale: 0.6,
            offset: 0.3,
        }
    }

    #[test]
    fn model_starts_at_scale_plus_offset() {
        let p = truth();
        assert_relative_eq!(p.evaluate(0.0), p.scale + p.offset, epsilon = 1e-14);

        let p = QpParams::default();
        assert_relative_eq!(p.evaluate(0.0), 1.05, epsilon = 1e-14);
    }

    #[test]
    fn model_is_periodic_without_decay_or_trend() {
        let p = QpParams {
            decay_length: 1e12,
            slope: 0.0,
            ..truth()
        };
        for lag in [3.0, 7.5, 11.0] {
            assert_relative_eq!(p.evaluate(lag), p.evaluate(lag + p.period), epsilon = 1e-10);
        }
        assert_relative_eq!(p.evaluate(p.period), p.scale + p.offset, epsilon = 1e-10);
    }

    #[test]
    fn qp_model_matches_pointwise() {
        let lags = lag_grid(10, 1.3);
        let p = truth();
        let curve = qp_model(&p, &lags);
        for (lag, v) in lags.iter().zip(curve.iter()) {
            assert_eq!(*v, p.evaluate(*lag));
        }
    }

    #[test]
    fn params_array_round_trip_order() {
        let p = truth();
        let arr = p.to_array();
        assert_eq!(arr[3], 20.0);
        assert_eq!(QpParams::from_slice(&arr).unwrap(), p);
        assert!(QpParams::from_slice(&arr[..6]).is_err());
    }

    #[test]
    fn likelihood_is_zero_at_truth() {
        let lags = lag_grid(100, 0.5);
        let acf = qp_model(&truth(), &lags);
        assert_eq!(log_likelihood(&truth(), &lags, &acf), 0.0);
        assert!(neg_log_likelihood(&QpParams::default(), &lags, &acf) > 0.0);
    }

    #[test]
    fn zero_amplitude_is_infinite_objective() {
        let lags = lag_grid(10, 1.0);
        let acf = vec![0.5; 10];
        let p = QpParams {
            amplitude: 0.0,
            ..truth()
        };
        assert_eq!(neg_log_likelihood(&p, &lags, &acf), f64::INFINITY);
    }

    #[test]
    fn fit_from_truth_stays_at_truth() {
        let lags = lag_grid(120, 0.5);
        let acf = qp_model(&truth(), &lags);
        let fit = fit_qp(&lags, &acf, &QpFitConfig::default().with_initial(truth())).unwrap();

        let got = fit.params.to_array();
        for (a, b) in got.iter().zip(truth().to_array().iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-9);
        }
        assert!(fit.neg_log_likelihood < 1e-12);
    }

    #[test]
    fn fit_from_nearby_recovers_period() {
        let lags = lag_grid(120, 0.5);
        let acf = qp_model(&truth(), &lags);
        let start = QpParams {
            period: 19.7,
            offset: 0.25,
            ..truth()
        };
        let config = QpFitConfig::default()
            .with_initial(start)
            .with_optimizer(NelderMeadConfig::default().with_max_iter(20_000));
        let fit = fit_qp(&lags, &acf, &config).unwrap();

        assert!(
            (fit.params.period - 20.0).abs() < 0.1,
            "period = {}",
            fit.params.period
        );
        assert!(fit.neg_log_likelihood < 1e-3);
    }

    #[test]
    fn fit_respects_bounds() {
        let lags = lag_grid(60, 1.0);
        let acf = qp_model(&truth(), &lags);
        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY); QP_DIM];
        bounds[3] = (10.0, 15.0);

        let config = QpFitConfig::default()
            .with_initial(QpParams {
                period: 12.0,
                ..truth()
            })
            .with_bounds(bounds);
        let fit = fit_qp(&lags, &acf, &config).unwrap();
        assert!(fit.params.period >= 10.0 && fit.params.period <= 15.0);
    }

    #[test]
    fn fit_reports_non_convergence() {
        let lags = lag_grid(50, 1.0);
        let acf = qp_model(&truth(), &lags);
        let config =
            QpFitConfig::default().with_optimizer(NelderMeadConfig::default().with_max_iter(5));
        let fit = fit_qp(&lags, &acf, &config).unwrap();

        assert!(!fit.converged);
        assert_eq!(fit.iterations, 5);
        assert!(fit.neg_log_likelihood.is_finite());
    }

    #[test]
    fn fit_validates_input() {
        let config = QpFitConfig::default();
        assert_eq!(fit_qp(&[], &[], &config), Err(RotationError::EmptyData));
        assert!(matches!(
            fit_qp(&[1.0, 2.0], &[1.0], &config),
            Err(RotationError::DimensionMismatch { .. })
        ));
        assert_eq!(
            fit_qp(&[1.0, 2.0], &[1.0, f64::NAN], &config),
            Err(RotationError::NonFiniteValue { index: 1 })
        );

        let bad_bounds = QpFitConfig::default().with_bounds(vec![(0.0, 1.0); 3]);
        assert!(matches!(
            fit_qp(&[1.0, 2.0], &[1.0, 0.5], &bad_bounds),
            Err(RotationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn fit_qp_to_acf_seeds_period() {
        let lags = lag_grid(120, 0.5);
        let acf = AcfResult {
            period: Some(20.0),
            acf: qp_model(&truth(), &lags),
            lags,
            amplitude: 1.0,
            peaks: vec![],
        };
        let config = QpFitConfig::default()
            .with_initial(QpParams {
                period: 5.0,
                ..truth()
            })
            .with_optimizer(NelderMeadConfig::default().with_max_iter(0));
        let fit = fit_qp_to_acf(&acf, &config).unwrap();

        // No iterations: the result is the seeded start
        assert_eq!(fit.params.period, 20.0);
        assert!(fit.neg_log_likelihood < 1e-12);
    }

    #[test]
    fn acf_power_spectrum_peaks_at_model_period() {
        // 128 lags at 0.5 spacing, period 16: fundamental at 128 * 0.5 / 16
        let params = QpParams {
            decay_length: 1e6,
            period: 16.0,
            slope: 0.0,
            ..truth()
        };
        let lags = lag_grid(128, 0.5);
        let spectrum = acf_power_spectrum(&qp_model(&params, &lags));
        assert_eq!(spectrum.len(), 65);

        let peak = spectrum
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 4);
    }
}
