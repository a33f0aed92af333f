//! Series transformations applied ahead of period estimation.
//!
//! - Uniform resampling with linear gap filling
//! - Gaussian kernel smoothing and curve mirroring

pub mod resample;
pub mod smooth;

pub use resample::{interpolate_linear, resample_uniform, uniform_grid};
pub use smooth::{convolve_same, gaussian_kernel, mirror};
