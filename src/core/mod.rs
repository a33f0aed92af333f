//! Core data structures for photometric time series.

mod light_curve;

pub(crate) use light_curve::validate_pair;
pub use light_curve::{LightCurve, MIN_OBSERVATIONS};
