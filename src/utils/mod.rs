//! Numerical utilities shared by the estimators and model fitters.

pub mod ols;
pub mod optimization;
pub mod stats;

pub use ols::{detrend_linear, fit_line, LineFit};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::{find_nearest, mean, median, percentile, rms};
