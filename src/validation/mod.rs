//! Validation of recovered rotation periods against injected truth.
//!
//! # Example
//!
//! ```
//! use gprot::validation::{classify, RecoveryOutcome, RecoveryThresholds};
//!
//! let thresholds = RecoveryThresholds::default();
//! assert_eq!(classify(10.0, Some(10.3), &thresholds), RecoveryOutcome::Success);
//! assert_eq!(classify(10.0, None, &thresholds), RecoveryOutcome::Failure);
//! ```

pub mod recovery;

pub use recovery::{
    classify, relative_error, success_by_amplitude, summarize, AmplitudeBin, RecoveryOutcome,
    RecoverySummary, RecoveryThresholds, StarRecovery,
};
