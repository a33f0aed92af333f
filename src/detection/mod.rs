//! Rotation period detection.
//!
//! This module provides:
//! - [`simple_acf`]: period from the smoothed autocorrelation function
//! - [`lomb_scargle`]: period from a Lomb-Scargle periodogram
//! - FFT helpers and local-maximum detection shared by both

pub mod acf;
pub mod fft;
pub mod lomb_scargle;
pub mod peaks;

pub use acf::{simple_acf, smooth_acf, AcfConfig, AcfResult, KEPLER_LONG_CADENCE};
pub use fft::{autocorrelation_fft, autocorrelation_fft_fast, power_spectrum};
pub use lomb_scargle::{lomb_scargle, LombScargleConfig, LombScargleResult};
pub use peaks::{find_peaks, highest_peak};
