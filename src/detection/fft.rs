//! FFT utilities for autocorrelation and spectral diagnostics.

use rustfft::{num_complex::Complex64, FftPlanner};

/// Estimate the autocorrelation function of a series with the FFT.
///
/// The mean is removed, the series is zero-padded to twice its length, and
/// the inverse transform of the power spectrum gives the lagged products
/// without circular wrap-around. The first `n` lags are returned, normalised so
/// that lag 0 equals exactly 1.0. Any length is accepted.
///
/// A series with zero variance has no defined normalisation and yields an
/// all-zero curve.
///
/// # Example
/// ```
/// use gprot::detection::autocorrelation_fft;
///
/// let series: Vec<f64> = (0..200).map(|i| (i as f64 * 0.3).sin()).collect();
/// let acf = autocorrelation_fft(&series);
/// assert_eq!(acf.len(), 200);
/// assert_eq!(acf[0], 1.0);
/// ```
pub fn autocorrelation_fft(series: &[f64]) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }

    let mean = series.iter().sum::<f64>() / n as f64;
    let mut buffer: Vec<Complex64> = series
        .iter()
        .map(|&x| Complex64::new(x - mean, 0.0))
        .chain(std::iter::repeat(Complex64::new(0.0, 0.0)).take(n))
        .collect();

    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(2 * n).process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex64::new(c.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(2 * n).process(&mut buffer);

    let zero_lag = buffer[0].re;
    if !(zero_lag.is_finite() && zero_lag > 0.0) {
        return vec![0.0; n];
    }

    buffer.iter().take(n).map(|c| c.re / zero_lag).collect()
}

/// [`autocorrelation_fft`] on the leading `2^k` samples, where `2^k` is the
/// largest power of two not exceeding the series length.
pub fn autocorrelation_fft_fast(series: &[f64]) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }
    let n = 1usize << (usize::BITS - 1 - series.len().leading_zeros());
    autocorrelation_fft(&series[..n])
}

/// Squared FFT magnitude of a real signal for frequencies `0..=n/2`.
///
/// Diagnostic spectrum of an ACF curve; the Fourier transform of an
/// autocorrelation is the power spectral density of the original signal.
pub fn power_spectrum(signal: &[f64]) -> Vec<f64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    let mut planner = FftPlanner::new();
    planner.plan_fft_forward(n).process(&mut buffer);

    buffer.truncate(n / 2 + 1);
    buffer.iter().map(|c| c.norm_sqr()).collect()
}
