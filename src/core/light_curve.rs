//! LightCurve data structure for photometric time series.

use crate::error::{Result, RotationError};

/// Smallest number of observations a light curve may hold.
pub const MIN_OBSERVATIONS: usize = 3;

/// A validated photometric time series.
///
/// Timestamps are strictly increasing and every value is finite. The
/// sampling may be irregular and contain gaps; estimators resample a
/// working copy and never touch the stored arrays.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
}

impl LightCurve {
    /// Create a light curve from paired time and flux sequences.
    ///
    /// # Errors
    /// * [`RotationError::EmptyData`] if both sequences are empty
    /// * [`RotationError::DimensionMismatch`] if the lengths differ
    /// * [`RotationError::InsufficientData`] for fewer than [`MIN_OBSERVATIONS`] points
    /// * [`RotationError::NonFiniteValue`] for NaN or infinite entries
    /// * [`RotationError::NonMonotonicTime`] if time does not strictly increase
    pub fn new(time: Vec<f64>, flux: Vec<f64>) -> Result<Self> {
        validate_pair(&time, &flux)?;
        if time.len() < MIN_OBSERVATIONS {
            return Err(RotationError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: time.len(),
            });
        }

        for (i, (t, f)) in time.iter().zip(flux.iter()).enumerate() {
            if !t.is_finite() || !f.is_finite() {
                return Err(RotationError::NonFiniteValue { index: i });
            }
        }

        for i in 1..time.len() {
            if time[i] <= time[i - 1] {
                return Err(RotationError::NonMonotonicTime { index: i });
            }
        }

        Ok(Self { time, flux })
    }

    /// Create a light curve from `(time, flux)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        let (time, flux) = pairs.iter().copied().unzip();
        Self::new(time, flux)
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false for a constructed light curve; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    /// First timestamp.
    pub fn start(&self) -> f64 {
        self.time[0]
    }

    /// Last timestamp.
    pub fn end(&self) -> f64 {
        self.time[self.time.len() - 1]
    }

    /// Time covered between the first and last observation.
    pub fn span(&self) -> f64 {
        self.end() - self.start()
    }

    /// Keep every `stride`-th observation, starting with the first.
    ///
    /// Returns an error if the thinned curve would be too short.
    pub fn subsample(&self, stride: usize) -> Result<Self> {
        if stride == 0 {
            return Err(RotationError::InvalidParameter(
                "subsample stride must be positive".to_string(),
            ));
        }
        let time: Vec<f64> = self.time.iter().step_by(stride).copied().collect();
        let flux: Vec<f64> = self.flux.iter().step_by(stride).copied().collect();
        if time.len() < MIN_OBSERVATIONS {
            return Err(RotationError::InsufficientData {
                needed: MIN_OBSERVATIONS,
                got: time.len(),
            });
        }
        Ok(Self { time, flux })
    }
}

/// Check that two paired sequences are non-empty and of equal length.
pub(crate) fn validate_pair(x: &[f64], y: &[f64]) -> Result<()> {
    if x.is_empty() && y.is_empty() {
        return Err(RotationError::EmptyData);
    }
    if x.len() != y.len() {
        return Err(RotationError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_valid_series() {
        let lc = LightCurve::new(vec![0.0, 0.5, 2.0], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(lc.len(), 3);
        assert!(!lc.is_empty());
        assert_eq!(lc.start(), 0.0);
        assert_eq!(lc.end(), 2.0);
        assert_eq!(lc.span(), 2.0);
    }

    #[test]
    fn new_rejects_two_points() {
        let err = LightCurve::new(vec![0.0, 1.0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, RotationError::InsufficientData { needed: 3, got: 2 });
    }

    #[test]
    fn new_rejects_empty() {
        let err = LightCurve::new(vec![], vec![]).unwrap_err();
        assert_eq!(err, RotationError::EmptyData);
    }

    #[test]
    fn new_rejects_mismatched_lengths() {
        let err = LightCurve::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            RotationError::DimensionMismatch {
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn new_rejects_non_monotonic_time() {
        let err = LightCurve::new(vec![0.0, 2.0, 2.0, 3.0], vec![1.0; 4]).unwrap_err();
        assert_eq!(err, RotationError::NonMonotonicTime { index: 2 });

        let err = LightCurve::new(vec![0.0, 2.0, 1.0], vec![1.0; 3]).unwrap_err();
        assert_eq!(err, RotationError::NonMonotonicTime { index: 2 });
    }

    #[test]
    fn new_rejects_non_finite() {
        let err = LightCurve::new(vec![0.0, 1.0, 2.0], vec![1.0, f64::NAN, 3.0]).unwrap_err();
        assert_eq!(err, RotationError::NonFiniteValue { index: 1 });

        let err =
            LightCurve::new(vec![0.0, f64::INFINITY, 2.0], vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, RotationError::NonFiniteValue { index: 1 });
    }

    #[test]
    fn from_pairs_unzips() {
        let lc = LightCurve::from_pairs(&[(0.0, 5.0), (1.0, 6.0), (3.0, 7.0)]).unwrap();
        assert_eq!(lc.time(), &[0.0, 1.0, 3.0]);
        assert_eq!(lc.flux(), &[5.0, 6.0, 7.0]);
    }

    #[test]
    fn subsample_takes_every_nth() {
        let time: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let lc = LightCurve::new(time.clone(), time).unwrap();
        let sub = lc.subsample(3).unwrap();
        assert_eq!(sub.time(), &[0.0, 3.0, 6.0, 9.0]);

        assert!(lc.subsample(0).is_err());
        assert!(matches!(
            lc.subsample(5),
            Err(RotationError::InsufficientData { .. })
        ));
    }
}
