//! Kernel smoothing of autocorrelation curves.

/// Gaussian smoothing weights sampled at `x = -half_width, ..., half_width - 1`.
///
/// Each weight is `1 / (2π·√σ) · exp(-x² / (2σ²))`. The prefactor does not
/// normalise the kernel to unit sum; only the shape matters for locating
/// peaks.
pub fn gaussian_kernel(half_width: usize, sigma: f64) -> Vec<f64> {
    let norm = 1.0 / (2.0 * std::f64::consts::PI * sigma.sqrt());
    let hw = half_width as i64;
    (-hw..hw)
        .map(|x| {
            let x = x as f64;
            norm * (-0.5 * x * x / (sigma * sigma)).exp()
        })
        .collect()
}

/// Discrete convolution returning the central part with the length of
/// `signal`.
///
/// Samples outside `signal` count as zero. Output `i` is element
/// `i + (m - 1) / 2` of the full convolution, where `m` is the kernel
/// length, so even-length kernels lean one sample toward earlier indices.
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let m = kernel.len();
    if n == 0 || m == 0 {
        return vec![0.0; n];
    }

    let offset = (m - 1) / 2;
    (0..n)
        .map(|i| {
            let k = i + offset; // index into the full convolution
            let j_min = k.saturating_sub(n - 1);
            let j_max = k.min(m - 1);
            (j_min..=j_max).map(|j| signal[k - j] * kernel[j]).sum()
        })
        .collect()
}

/// Mirror a one-sided curve about zero.
///
/// Returns `2n` samples: the reversed curve followed by the curve itself,
/// with lags negated on the reversed half. Lag zero appears twice.
pub fn mirror(values: &[f64], lags: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mirrored_values = values.iter().rev().chain(values.iter()).copied().collect();
    let mirrored_lags = lags
        .iter()
        .rev()
        .map(|&l| -l)
        .chain(lags.iter().copied())
        .collect();
    (mirrored_values, mirrored_lags)
}
