//! Period recovery diagnostics for injection tests.
//!
//! Compares recovered rotation periods against the injected truth and
//! summarises a batch of stars.

use statrs::statistics::{Data, Median, Statistics};

use crate::error::{Result, RotationError};

/// Thresholds used to classify a recovered period.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecoveryThresholds {
    /// Relative error below which a recovery succeeds.
    pub success: f64,
    /// Relative error above which a recovery fails.
    pub failure: f64,
    /// `recovered / true` above this marks a failed overestimate.
    pub overestimate_ratio: f64,
    /// `recovered / true` below this marks a failed underestimate.
    pub underestimate_ratio: f64,
}

impl Default for RecoveryThresholds {
    fn default() -> Self {
        Self {
            success: 0.1,
            failure: 0.2,
            overestimate_ratio: 1.3,
            underestimate_ratio: 0.5,
        }
    }
}

/// Outcome of a single recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecoveryOutcome {
    /// Within the success threshold.
    Success,
    /// Beyond the failure threshold, or no period recovered.
    Failure,
    /// Between the two thresholds.
    Ambiguous,
}

/// One star in an injection-recovery run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StarRecovery {
    pub id: usize,
    pub true_period: f64,
    pub recovered: Option<f64>,
    /// Injected variability amplitude, used to bin success rates.
    pub amplitude: f64,
}

impl StarRecovery {
    /// Relative error, if a usable period was recovered.
    pub fn relative_error(&self) -> Option<f64> {
        self.recovered
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| relative_error(self.true_period, p))
    }

    /// `recovered / true`, if a usable period was recovered.
    pub fn ratio(&self) -> Option<f64> {
        self.recovered
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| p / self.true_period)
    }
}

/// Aggregate statistics over a batch of recoveries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecoverySummary {
    pub total: usize,
    pub successes: usize,
    pub failures: usize,
    pub ambiguous: usize,
    /// Median relative error over stars with a recovered period.
    pub median_relative_error: Option<f64>,
    /// Population standard deviation of the same errors.
    pub std_relative_error: Option<f64>,
    /// Failed stars whose period was overestimated.
    pub overestimated: Vec<usize>,
    /// Failed stars whose period was underestimated.
    pub underestimated: Vec<usize>,
}

impl RecoverySummary {
    /// Fraction of stars recovered successfully; zero for an empty batch.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successes as f64 / self.total as f64
        }
    }
}

/// `|true - recovered| / true`.
pub fn relative_error(true_period: f64, recovered: f64) -> f64 {
    (true_period - recovered).abs() / true_period
}

/// Classify a recovered period against the truth.
pub fn classify(
    true_period: f64,
    recovered: Option<f64>,
    thresholds: &RecoveryThresholds,
) -> RecoveryOutcome {
    let recovered = match recovered {
        Some(p) if p.is_finite() && p > 0.0 => p,
        _ => return RecoveryOutcome::Failure,
    };

    let err = relative_error(true_period, recovered);
    if err < thresholds.success {
        RecoveryOutcome::Success
    } else if err > thresholds.failure || !err.is_finite() {
        RecoveryOutcome::Failure
    } else {
        RecoveryOutcome::Ambiguous
    }
}

/// Summarise a batch of recoveries.
pub fn summarize(records: &[StarRecovery], thresholds: &RecoveryThresholds) -> RecoverySummary {
    let mut summary = RecoverySummary {
        total: records.len(),
        successes: 0,
        failures: 0,
        ambiguous: 0,
        median_relative_error: None,
        std_relative_error: None,
        overestimated: Vec::new(),
        underestimated: Vec::new(),
    };

    for star in records {
        match classify(star.true_period, star.recovered, thresholds) {
            RecoveryOutcome::Success => summary.successes += 1,
            RecoveryOutcome::Ambiguous => summary.ambiguous += 1,
            RecoveryOutcome::Failure => {
                summary.failures += 1;
                match star.ratio() {
                    Some(r) if r > thresholds.overestimate_ratio => {
                        summary.overestimated.push(star.id)
                    }
                    Some(r) if r < thresholds.underestimate_ratio => {
                        summary.underestimated.push(star.id)
                    }
                    _ => {}
                }
            }
        }
    }

    let errors: Vec<f64> = records
        .iter()
        .filter_map(StarRecovery::relative_error)
        .filter(|e| e.is_finite())
        .collect();
    if !errors.is_empty() {
        summary.std_relative_error = Some(errors.iter().population_std_dev());
        summary.median_relative_error = Some(Data::new(errors).median());
    }

    summary
}

/// Recovery counts for stars whose amplitude falls in `[lower, upper)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmplitudeBin {
    pub lower: f64,
    pub upper: f64,
    pub total: usize,
    pub successes: usize,
}

impl AmplitudeBin {
    /// Fraction of stars in the bin recovered successfully; `None` for an
    /// empty bin.
    pub fn success_rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.successes as f64 / self.total as f64)
    }
}

/// Success rate as a function of injected amplitude.
///
/// `edges` are ascending bin boundaries; bin `i` covers
/// `[edges[i], edges[i + 1])`. Stars outside every bin are skipped.
///
/// # Errors
/// [`RotationError::InvalidParameter`] for fewer than two edges or edges
/// that are not strictly increasing.
pub fn success_by_amplitude(
    records: &[StarRecovery],
    edges: &[f64],
    thresholds: &RecoveryThresholds,
) -> Result<Vec<AmplitudeBin>> {
    if edges.len() < 2 {
        return Err(RotationError::InvalidParameter(format!(
            "need at least two amplitude edges, got {}",
            edges.len()
        )));
    }
    if edges.windows(2).any(|w| !(w[0] < w[1])) {
        return Err(RotationError::InvalidParameter(
            "amplitude edges must be strictly increasing".to_string(),
        ));
    }

    let mut bins: Vec<AmplitudeBin> = edges
        .windows(2)
        .map(|w| AmplitudeBin {
            lower: w[0],
            upper: w[1],
            total: 0,
            successes: 0,
        })
        .collect();

    for star in records {
        // First edge above the amplitude; the bin is the one before it.
        let upper = edges.partition_point(|&e| e <= star.amplitude);
        if upper == 0 || upper == edges.len() {
            continue;
        }
        let bin = &mut bins[upper - 1];
        bin.total += 1;
        if classify(star.true_period, star.recovered, thresholds) == RecoveryOutcome::Success {
            bin.successes += 1;
        }
    }

    Ok(bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn star(id: usize, true_period: f64, recovered: Option<f64>) -> StarRecovery {
        StarRecovery {
            id,
            true_period,
            recovered,
            amplitude: 1.0,
        }
    }

    #[test]
    fn classify_thresholds() {
        let t = RecoveryThresholds::default();
        assert_eq!(classify(10.0, Some(10.5), &t), RecoveryOutcome::Success);
        assert_eq!(classify(10.0, Some(11.5), &t), RecoveryOutcome::Ambiguous);
        assert_eq!(classify(10.0, Some(12.5), &t), RecoveryOutcome::Failure);
        assert_eq!(classify(10.0, Some(7.0), &t), RecoveryOutcome::Failure);
    }

    #[test]
    fn missing_period_is_failure() {
        let t = RecoveryThresholds::default();
        assert_eq!(classify(10.0, None, &t), RecoveryOutcome::Failure);
        assert_eq!(classify(10.0, Some(0.0), &t), RecoveryOutcome::Failure);
        assert_eq!(classify(10.0, Some(f64::NAN), &t), RecoveryOutcome::Failure);
    }

    #[test]
    fn summary_counts_and_directions() {
        let records = vec![
            star(0, 10.0, Some(10.2)),
            star(1, 10.0, Some(10.4)),
            star(2, 10.0, Some(11.5)),
            star(3, 10.0, Some(20.0)),
            star(4, 10.0, Some(4.0)),
            star(5, 10.0, Some(7.5)),
            star(6, 10.0, None),
        ];
        let s = summarize(&records, &RecoveryThresholds::default());

        assert_eq!(s.total, 7);
        assert_eq!(s.successes, 2);
        assert_eq!(s.ambiguous, 1);
        assert_eq!(s.failures, 4);
        assert_eq!(s.overestimated, vec![3]);
        assert_eq!(s.underestimated, vec![4]);
        assert_relative_eq!(s.success_rate(), 2.0 / 7.0);

        // errors: 0.02, 0.04, 0.15, 1.0, 0.6, 0.25
        assert_relative_eq!(s.median_relative_error.unwrap(), 0.2, epsilon = 1e-12);
        assert!(s.std_relative_error.unwrap() > 0.0);
    }

    #[test]
    fn summary_of_empty_batch() {
        let s = summarize(&[], &RecoveryThresholds::default());
        assert_eq!(s.total, 0);
        assert_eq!(s.success_rate(), 0.0);
        assert_eq!(s.median_relative_error, None);
        assert_eq!(s.std_relative_error, None);
    }

    #[test]
    fn population_std_of_identical_errors_is_zero() {
        let records = vec![star(0, 10.0, Some(11.0)), star(1, 20.0, Some(22.0))];
        let s = summarize(&records, &RecoveryThresholds::default());
        assert_relative_eq!(s.std_relative_error.unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(s.median_relative_error.unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn success_rate_binned_by_amplitude() {
        let mut records = vec![
            star(0, 10.0, Some(10.1)),
            star(1, 10.0, Some(25.0)),
            star(2, 10.0, Some(10.2)),
            star(3, 10.0, Some(9.9)),
            star(4, 10.0, None),
        ];
        for (record, amplitude) in records.iter_mut().zip([0.1, 0.5, 2.0, 3.0, 50.0]) {
            record.amplitude = amplitude;
        }

        let bins =
            success_by_amplitude(&records, &[0.0, 1.0, 10.0], &RecoveryThresholds::default())
                .unwrap();
        assert_eq!(bins.len(), 2);
        assert_eq!((bins[0].total, bins[0].successes), (2, 1));
        assert_eq!((bins[1].total, bins[1].successes), (2, 2));
        assert_relative_eq!(bins[0].success_rate().unwrap(), 0.5);
        assert_relative_eq!(bins[1].success_rate().unwrap(), 1.0);
    }

    #[test]
    fn amplitude_bins_validate_edges() {
        let t = RecoveryThresholds::default();
        assert!(success_by_amplitude(&[], &[1.0], &t).is_err());
        assert!(success_by_amplitude(&[], &[0.0, 2.0, 1.0], &t).is_err());

        let bins = success_by_amplitude(&[], &[0.0, 1.0], &t).unwrap();
        assert_eq!(bins[0].total, 0);
        assert_eq!(bins[0].success_rate(), None);
    }
}
