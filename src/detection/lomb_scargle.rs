//! Lomb-Scargle periodogram on a fixed period grid.
//!
//! Handles uneven sampling directly, without resampling. The period is the
//! highest strict local maximum of the power, the same rule the ACF
//! estimator uses.
//!
//! This is the classic periodogram: unweighted, with the sample mean
//! subtracted once up front. It is not the generalised (floating-mean,
//! error-weighted) form fitted with per-point flux uncertainties, since
//! [`LightCurve`] carries no flux errors. For homoscedastic noise and a
//! well-sampled curve the two pick the same peak; with strongly uneven
//! errors or sparse sampling of a large-amplitude signal they can differ.

use log::debug;

use super::peaks::{find_peaks, highest_peak};
use crate::core::LightCurve;
use crate::error::{Result, RotationError};

/// Configuration for the Lomb-Scargle period search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LombScargleConfig {
    /// Shortest trial period.
    pub min_period: f64,
    /// Longest trial period.
    pub max_period: f64,
    /// Number of trial periods, spaced linearly.
    pub n_periods: usize,
}

impl Default for LombScargleConfig {
    fn default() -> Self {
        Self {
            min_period: 1.0,
            max_period: 50.0,
            n_periods: 1000,
        }
    }
}

impl LombScargleConfig {
    /// Set the trial period range.
    pub fn with_period_range(mut self, min: f64, max: f64) -> Self {
        self.min_period = min;
        self.max_period = max;
        self
    }

    /// Set the number of trial periods.
    pub fn with_n_periods(mut self, n: usize) -> Self {
        self.n_periods = n;
        self
    }

    /// The trial period grid.
    pub fn period_grid(&self) -> Vec<f64> {
        match self.n_periods {
            0 => Vec::new(),
            1 => vec![self.min_period],
            n => {
                let step = (self.max_period - self.min_period) / (n - 1) as f64;
                (0..n).map(|i| self.min_period + i as f64 * step).collect()
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.min_period.is_finite() && self.min_period > 0.0) {
            return Err(RotationError::InvalidParameter(format!(
                "min_period must be positive, got {}",
                self.min_period
            )));
        }
        if !(self.max_period.is_finite() && self.max_period > self.min_period) {
            return Err(RotationError::InvalidParameter(format!(
                "max_period must exceed min_period ({} <= {})",
                self.max_period, self.min_period
            )));
        }
        if self.n_periods < 3 {
            return Err(RotationError::InvalidParameter(format!(
                "need at least 3 trial periods, got {}",
                self.n_periods
            )));
        }
        Ok(())
    }
}

/// Result of a Lomb-Scargle period search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LombScargleResult {
    /// Period of the highest periodogram peak; `None` when no peak exists.
    pub period: Option<f64>,
    /// Trial periods.
    pub periods: Vec<f64>,
    /// Normalised power at each trial period.
    pub power: Vec<f64>,
}

impl LombScargleResult {
    /// Power at the selected period.
    pub fn peak_power(&self) -> Option<f64> {
        let period = self.period?;
        self.periods
            .iter()
            .position(|&p| p == period)
            .map(|i| self.power[i])
    }
}

/// Compute the Lomb-Scargle periodogram of a light curve and pick its
/// highest peak.
///
/// Power is the classic normalised form
/// `P = [ (Σ y cos ω(t-τ))² / Σ cos² ω(t-τ) + (Σ y sin ω(t-τ))² / Σ sin² ω(t-τ) ] / (2σ²)`
/// on the mean-subtracted flux. A constant light curve has zero power
/// everywhere and no period.
pub fn lomb_scargle(curve: &LightCurve, config: &LombScargleConfig) -> Result<LombScargleResult> {
    config.validate()?;

    let t = curve.time();
    let n = t.len() as f64;
    let mean = curve.flux().iter().sum::<f64>() / n;
    let y: Vec<f64> = curve.flux().iter().map(|v| v - mean).collect();
    let variance = y.iter().map(|v| v * v).sum::<f64>() / n;

    let periods = config.period_grid();
    let power: Vec<f64> = if variance > 0.0 {
        periods
            .iter()
            .map(|&p| power_at(t, &y, variance, 2.0 * std::f64::consts::PI / p))
            .collect()
    } else {
        vec![0.0; periods.len()]
    };

    let peaks = find_peaks(&power);
    let period = highest_peak(&power, &peaks).map(|i| periods[i]);
    debug!(
        "Lomb-Scargle: {} trial periods, {} peaks, period {:?}",
        periods.len(),
        peaks.len(),
        period
    );

    Ok(LombScargleResult {
        period,
        periods,
        power,
    })
}

/// Normalised periodogram power at angular frequency `omega`.
fn power_at(t: &[f64], y: &[f64], variance: f64, omega: f64) -> f64 {
    let (s2, c2) = t.iter().fold((0.0, 0.0), |(s, c), &ti| {
        let arg = 2.0 * omega * ti;
        (s + arg.sin(), c + arg.cos())
    });
    let tau = s2.atan2(c2) / (2.0 * omega);

    let (mut yc, mut ys, mut cc, mut ss) = (0.0, 0.0, 0.0, 0.0);
    for (&ti, &yi) in t.iter().zip(y.iter()) {
        let (sin, cos) = (omega * (ti - tau)).sin_cos();
        yc += yi * cos;
        ys += yi * sin;
        cc += cos * cos;
        ss += sin * sin;
    }

    let mut power = 0.0;
    if cc > f64::EPSILON {
        power += yc * yc / cc;
    }
    if ss > f64::EPSILON {
        power += ys * ys / ss;
    }
    power / (2.0 * variance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn period_grid_is_linear() {
        let grid = LombScargleConfig::default().period_grid();
        assert_eq!(grid.len(), 1000);
        assert_relative_eq!(grid[0], 1.0);
        assert_relative_eq!(grid[999], 50.0, epsilon = 1e-12);
    }

    #[test]
    fn recovers_period_on_uneven_sampling() {
        // Irregular but deterministic spacing between 0.1 and 0.5 days
        let mut t = 0.0;
        let mut time = Vec::new();
        for i in 0..600 {
            time.push(t);
            t += 0.1 + 0.4 * (((i * 37) % 17) as f64 / 16.0);
        }
        let flux: Vec<f64> = time
            .iter()
            .map(|t| 0.01 * (2.0 * std::f64::consts::PI * t / 9.0).sin())
            .collect();
        let curve = LightCurve::new(time, flux).unwrap();

        let result = lomb_scargle(&curve, &LombScargleConfig::default()).unwrap();
        let period = result.period.unwrap();
        assert!((period - 9.0).abs() < 0.2, "period = {}", period);
        assert!(result.peak_power().unwrap() > 0.5);
    }

    #[test]
    fn constant_curve_has_no_period() {
        let time: Vec<f64> = (0..100).map(|i| i as f64 * 0.3).collect();
        let curve = LightCurve::new(time, vec![2.0; 100]).unwrap();
        let result = lomb_scargle(&curve, &LombScargleConfig::default()).unwrap();

        assert_eq!(result.period, None);
        assert!(result.power.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn rejects_bad_grid() {
        let time: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let curve = LightCurve::new(time.clone(), time).unwrap();

        let bad = LombScargleConfig::default().with_period_range(5.0, 2.0);
        assert!(lomb_scargle(&curve, &bad).is_err());

        let bad = LombScargleConfig::default().with_n_periods(2);
        assert!(lomb_scargle(&curve, &bad).is_err());

        let bad = LombScargleConfig::default().with_period_range(0.0, 2.0);
        assert!(lomb_scargle(&curve, &bad).is_err());
    }
}
