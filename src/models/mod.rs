//! Models fitted to, or seeded from, the autocorrelation function.
//!
//! - [`quasi_periodic`]: the damped periodic ACF model and its least-squares fit
//! - [`gp_init`]: starting values for the Gaussian-process rotation model

pub mod gp_init;
pub mod quasi_periodic;

pub use gp_init::{gp_initialisation, GpInitConfig, GpInitialisation};
pub use quasi_periodic::{
    acf_power_spectrum, fit_qp, fit_qp_to_acf, log_likelihood, neg_log_likelihood, qp_model,
    QpFit, QpFitConfig, QpParams, QP_DIM,
};
