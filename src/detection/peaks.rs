//! Local-maximum detection shared by the ACF and periodogram estimators.

/// Indices of strict interior local maxima.
///
/// Index `i` is a peak when `values[i - 1] < values[i] > values[i + 1]`.
/// End points are never peaks; plateaus and NaN neighbourhoods are skipped.
pub fn find_peaks(values: &[f64]) -> Vec<usize> {
    if values.len() < 3 {
        return Vec::new();
    }
    (1..values.len() - 1)
        .filter(|&i| values[i - 1] < values[i] && values[i + 1] < values[i])
        .collect()
}

/// The peak with the largest value, or `None` if `peaks` is empty.
///
/// The earliest peak wins a tie.
pub fn highest_peak(values: &[f64], peaks: &[usize]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &p in peaks {
        match best {
            Some(b) if values[p] <= values[b] => {}
            _ => best = Some(p),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_peaks_known_maxima() {
        let values = [0.0, 2.0, 1.0, 1.5, 3.0, 0.5, 0.2, 0.9, 0.1];
        assert_eq!(find_peaks(&values), vec![1, 4, 7]);
    }

    #[test]
    fn find_peaks_ignores_edges_and_plateaus() {
        assert!(find_peaks(&[5.0, 1.0, 5.0]).is_empty());
        assert!(find_peaks(&[0.0, 1.0, 1.0, 0.0]).is_empty());
    }

    #[test]
    fn find_peaks_short_input() {
        assert!(find_peaks(&[]).is_empty());
        assert!(find_peaks(&[1.0, 2.0]).is_empty());
    }

    #[test]
    fn find_peaks_skips_nan() {
        assert!(find_peaks(&[0.0, f64::NAN, 0.0]).is_empty());
        assert_eq!(find_peaks(&[0.0, 1.0, 0.0, f64::NAN]), vec![1]);
    }

    #[test]
    fn highest_peak_global_max() {
        let values = [0.0, 2.0, 1.0, 1.5, 3.0, 0.5, 0.2, 0.9, 0.1];
        let peaks = find_peaks(&values);
        assert_eq!(highest_peak(&values, &peaks), Some(4));
    }

    #[test]
    fn highest_peak_tie_prefers_first() {
        let values = [0.0, 1.0, 0.0, 1.0, 0.0];
        assert_eq!(highest_peak(&values, &[1, 3]), Some(1));
    }

    #[test]
    fn highest_peak_none() {
        assert_eq!(highest_peak(&[1.0, 2.0], &[]), None);
    }
}
