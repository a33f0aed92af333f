//! # gprot
//!
//! Stellar rotation periods from photometric light curves.
//!
//! The main estimator is [`detection::simple_acf`]: resample the light curve
//! onto a uniform grid, remove a linear trend, autocorrelate, smooth, and
//! take the lag of the highest ACF peak as the rotation period. Around it
//! sit a quasi-periodic model fit to the ACF, a Lomb-Scargle cross-check,
//! Gaussian-process initialisation, and recovery diagnostics for
//! injection tests.
//!
//! ```
//! use gprot::prelude::*;
//!
//! let time: Vec<f64> = (0..400).map(|i| i as f64).collect();
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

#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod detection;
pub mod error;
pub mod models;
pub mod transform;
pub mod utils;
pub mod validation;

pub use error::{Result, RotationError};

pub mod prelude {
    pub use crate::core::LightCurve;
    pub use crate::detection::{
        lomb_scargle, simple_acf, AcfConfig, AcfResult, LombScargleConfig, KEPLER_LONG_CADENCE,
    };
    pub use crate::error::{Result, RotationError};
    pub use crate::models::{fit_qp_to_acf, gp_initialisation, GpInitConfig, QpFitConfig, QpParams};
    pub use crate::validation::{classify, summarize, RecoveryOutcome, RecoveryThresholds};
}
