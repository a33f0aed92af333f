//! Autocorrelation-based rotation period estimation.
//!
//! The estimator turns a gappy, unevenly sampled light curve into a period
//! by:
//! 1. resampling onto a uniform cadence with linear interpolation
//! 2. removing a least-squares straight line
//! 3. computing the autocorrelation via the FFT
//! 4. mirroring the curve about lag zero and smoothing it with a Gaussian kernel
//! 5. keeping positive lags below half the maximum lag, minus the zero lag
//! 6. picking the highest strict local maximum
//!
//! # Example
//! ```
//! use gprot::core::LightCurve;
//! use gprot::detection::{simple_acf, AcfConfig};
//!
//! let time: Vec<f64> = (0..1000).map(|i| i as f64).collect();
//! let flux: Vec<f64> = time
//!     .iter()
//!     .map(|t| (2.0 * std::f64::consts::PI * t / 20.0).sin())
//!     .collect();
//! let curve = LightCurve::new(time, flux).unwrap();
//!
//! let result = simple_acf(&curve, &AcfConfig::default().with_cadence(1.0)).unwrap();
//! let period = result.period.unwrap();
//! assert!((period - 20.0).abs() <= 1.0);
//! ```

use log::debug;

use super::fft::autocorrelation_fft;
use super::peaks::{find_peaks, highest_peak};
use crate::core::LightCurve;
use crate::error::{Result, RotationError};
use crate::transform::{convolve_same, gaussian_kernel, mirror, resample_uniform};
use crate::utils::{detrend_linear, mean, percentile, rms};

/// Kepler long-cadence sampling interval in days.
pub const KEPLER_LONG_CADENCE: f64 = 0.020_433_65;

/// Configuration for the ACF period estimator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcfConfig {
    /// Resampling step, in the time unit of the light curve.
    pub cadence: f64,
    /// Half width of the smoothing kernel, in samples.
    pub kernel_half_width: usize,
    /// Width parameter of the Gaussian smoothing kernel, in samples.
    pub kernel_sigma: f64,
    /// Percentile of the detrended flux reported as the amplitude.
    pub amplitude_percentile: f64,
    /// Detrended flux whose RMS falls below this fraction of the scatter of
    /// the mean-subtracted resampled flux is treated as having no
    /// variability.
    pub flat_tolerance: f64,
}

impl Default for AcfConfig {
    fn default() -> Self {
        Self {
            cadence: KEPLER_LONG_CADENCE,
            kernel_half_width: 28,
            kernel_sigma: 9.0,
            amplitude_percentile: 95.0,
            flat_tolerance: 1e-10,
        }
    }
}

impl AcfConfig {
    /// Set the resampling cadence.
    pub fn with_cadence(mut self, cadence: f64) -> Self {
        self.cadence = cadence;
        self
    }

    /// Set the smoothing kernel half width and sigma (both in samples).
    pub fn with_kernel(mut self, half_width: usize, sigma: f64) -> Self {
        self.kernel_half_width = half_width;
        self.kernel_sigma = sigma;
        self
    }

    /// Set the amplitude percentile.
    pub fn with_amplitude_percentile(mut self, q: f64) -> Self {
        self.amplitude_percentile = q;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.cadence.is_finite() && self.cadence > 0.0) {
            return Err(RotationError::InvalidParameter(format!(
                "cadence must be positive, got {}",
                self.cadence
            )));
        }
        if !(self.kernel_sigma.is_finite() && self.kernel_sigma > 0.0) {
            return Err(RotationError::InvalidParameter(format!(
                "kernel sigma must be positive, got {}",
                self.kernel_sigma
            )));
        }
        if !(0.0..=100.0).contains(&self.amplitude_percentile) {
            return Err(RotationError::InvalidParameter(format!(
                "amplitude percentile must lie in [0, 100], got {}",
                self.amplitude_percentile
            )));
        }
        Ok(())
    }
}

/// Output of the ACF period estimator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcfResult {
    /// Lag of the highest ACF peak; `None` when no peak exists.
    pub period: Option<f64>,
    /// Smoothed autocorrelation, one value per entry of `lags`.
    pub acf: Vec<f64>,
    /// Lags of the smoothed autocorrelation.
    pub lags: Vec<f64>,
    /// Robust variability amplitude of the detrended flux.
    pub amplitude: f64,
    /// Indices of the local maxima in `acf`.
    pub peaks: Vec<usize>,
}

impl AcfResult {
    /// Check if a period was detected.
    pub fn has_period(&self) -> bool {
        self.period.is_some()
    }

    /// Period with 0.0 standing in for "no detection".
    pub fn period_or_zero(&self) -> f64 {
        self.period.unwrap_or(0.0)
    }

    /// Smoothed ACF value at the selected period.
    pub fn peak_height(&self) -> Option<f64> {
        let period = self.period?;
        self.lags
            .iter()
            .position(|&l| l == period)
            .map(|i| self.acf[i])
    }

    /// Lags of every detected peak.
    pub fn peak_lags(&self) -> Vec<f64> {
        self.peaks.iter().map(|&i| self.lags[i]).collect()
    }
}

/// Estimate the rotation period of a light curve from its autocorrelation.
///
/// # Errors
/// * [`RotationError::InvalidParameter`] for a bad configuration
/// * [`RotationError::DegenerateInput`] when the resampled grid is too short
///   to fit the detrending line (cadence wider than half the time span)
pub fn simple_acf(curve: &LightCurve, config: &AcfConfig) -> Result<AcfResult> {
    config.validate()?;

    let (grid, flux) = resample_uniform(curve.time(), curve.flux(), config.cadence)?;
    let (detrended, line) = detrend_linear(&grid, &flux)?;
    debug!(
        "resampled {} observations onto {} grid points; trend slope {:e}",
        curve.len(),
        grid.len(),
        line.slope
    );

    let acf = if is_flat(&detrended, &flux, config.flat_tolerance) {
        debug!("detrended flux is flat; skipping autocorrelation");
        vec![0.0; detrended.len()]
    } else {
        autocorrelation_fft(&detrended)
    };

    let (acf, lags) = smooth_acf(&acf, config);
    let peaks = find_peaks(&acf);
    let period = highest_peak(&acf, &peaks).map(|i| lags[i]);
    let amplitude = percentile(&detrended, config.amplitude_percentile);

    debug!(
        "ACF: {} lags, {} peaks, period {:?}, amplitude {:e}",
        lags.len(),
        peaks.len(),
        period,
        amplitude
    );

    Ok(AcfResult {
        period,
        acf,
        lags,
        amplitude,
        peaks,
    })
}

/// Smooth a one-sided ACF and cut it to the usable lag range.
///
/// The curve is mirrored about lag zero, convolved with the Gaussian kernel,
/// and reduced to positive lags strictly below half the maximum lag, without
/// the zero-lag sample. Returns `(acf, lags)`.
pub fn smooth_acf(acf: &[f64], config: &AcfConfig) -> (Vec<f64>, Vec<f64>) {
    let n = acf.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let lags: Vec<f64> = (0..n).map(|i| i as f64 * config.cadence).collect();
    let (doubled, _) = mirror(acf, &lags);
    let kernel = gaussian_kernel(config.kernel_half_width, config.kernel_sigma);
    let smoothed = convolve_same(&doubled, &kernel);

    let half = lags[n - 1] / 2.0;
    smoothed[n..]
        .iter()
        .zip(lags.iter())
        .filter(|(_, lag)| **lag < half)
        .skip(1)
        .map(|(&v, &lag)| (v, lag))
        .unzip()
}

/// Detrended scatter at or below this multiple of `ε · |mean flux|` is
/// floating-point rounding, not variability.
const ROUNDING_FLOOR: f64 = 1e3 * f64::EPSILON;

/// True when the detrended residuals carry no variability relative to the
/// signal they came from.
///
/// The reference scale is the scatter of the mean-subtracted flux, so a
/// large constant flux level does not loosen the test. The rounding floor
/// catches constant curves whose mean is not exactly representable.
fn is_flat(detrended: &[f64], original: &[f64], tolerance: f64) -> bool {
    let residual = rms(detrended);
    if residual == 0.0 {
        return true;
    }
    let level = mean(original);
    if residual <= ROUNDING_FLOOR * level.abs() {
        return true;
    }
    let centered: Vec<f64> = original.iter().map(|v| v - level).collect();
    let scale = rms(&centered);
    scale == 0.0 || residual <= tolerance * scale
}
