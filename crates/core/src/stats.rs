//! Low-level statistics for cohort comparisons.
//!
//! Provides descriptive statistics, the pooled-variance two-sample t-test,
//! and the Mann-Whitney U rank test used as a distribution-free
//! cross-check. p-values come from `statrs` distribution CDFs.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::error::AnalysisError;

/// Arithmetic mean. Returns 0.0 for an empty slice; callers that must
/// reject empty cohorts do so before calling.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n-1 denominator). Returns 0.0 for fewer than 2
/// observations.
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (n as f64 - 1.0)
}

/// Sample standard deviation (n-1 denominator).
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Weighted mean `sum(w_i * v_i) / sum(w_i)`.
///
/// Callers pass only present weights; absent weights must be filtered out
/// beforehand so they do not dilute the denominator.
///
/// # Errors
/// Returns [`AnalysisError::NoUsableWeights`] when the slices are empty or
/// the weights sum to zero, and [`AnalysisError::EmptyCohort`] on a length
/// mismatch (a caller bug surfaced as an error rather than a panic).
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Result<f64, AnalysisError> {
    if values.len() != weights.len() {
        return Err(AnalysisError::EmptyCohort);
    }
    if values.is_empty() {
        return Err(AnalysisError::NoUsableWeights);
    }
    let total_weight: f64 = weights.iter().sum();
    if total_weight <= 0.0 {
        return Err(AnalysisError::NoUsableWeights);
    }
    let weighted_sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Ok(weighted_sum / total_weight)
}

/// Pooled standard deviation of two samples using n-1 variances:
/// `sqrt(((n_a-1)*var(a) + (n_b-1)*var(b)) / (n_a + n_b - 2))`.
///
/// # Errors
/// Returns [`AnalysisError::SampleTooSmall`] if either sample has fewer
/// than 2 observations.
pub fn pooled_std(a: &[f64], b: &[f64]) -> Result<f64, AnalysisError> {
    if a.len() < 2 {
        return Err(AnalysisError::SampleTooSmall { n: a.len() });
    }
    if b.len() < 2 {
        return Err(AnalysisError::SampleTooSmall { n: b.len() });
    }
    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let pooled_var =
        ((n_a - 1.0) * sample_variance(a) + (n_b - 1.0) * sample_variance(b)) / (n_a + n_b - 2.0);
    Ok(pooled_var.sqrt())
}

/// Result of a pooled-variance two-sample t-test.
#[derive(Debug, Clone, Copy)]
pub struct TwoSampleT {
    /// The t statistic for `mean(a) - mean(b)`.
    pub t_stat: f64,
    /// Degrees of freedom, `n_a + n_b - 2`.
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Two-sample independent t-test with pooled variance.
///
/// The pooled formulation is deliberate: it keeps the test statistic
/// consistent with the Cohen's d effect size, which divides by the same
/// pooled standard deviation.
///
/// # Errors
/// [`AnalysisError::SampleTooSmall`] for samples below 2 observations,
/// [`AnalysisError::ZeroPooledVariance`] for degenerate zero-variance
/// input (division by zero is rejected, not propagated as inf/NaN).
pub fn two_sample_t(a: &[f64], b: &[f64]) -> Result<TwoSampleT, AnalysisError> {
    let pooled = pooled_std(a, b)?;
    if pooled <= 0.0 {
        return Err(AnalysisError::ZeroPooledVariance);
    }
    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let std_error = pooled * (1.0 / n_a + 1.0 / n_b).sqrt();
    let t_stat = (mean(a) - mean(b)) / std_error;
    let df = n_a + n_b - 2.0;

    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AnalysisError::Distribution(e.to_string()))?;
    let p_value = (2.0 * (1.0 - t_dist.cdf(t_stat.abs()))).clamp(0.0, 1.0);

    Ok(TwoSampleT {
        t_stat,
        df,
        p_value,
    })
}

/// Result of a two-sided Mann-Whitney U test.
#[derive(Debug, Clone, Copy)]
pub struct MannWhitney {
    /// U statistic for the first sample.
    pub u_stat: f64,
    /// Two-sided p-value from the normal approximation.
    pub p_value: f64,
}

/// Two-sided Mann-Whitney U test.
///
/// Uses the normal approximation with midranks for ties, the tie
/// correction to the rank variance, and a 0.5 continuity correction. The
/// reported statistic is U for sample `a`.
///
/// # Errors
/// [`AnalysisError::SampleTooSmall`] for samples below 2 observations,
/// [`AnalysisError::ZeroRankVariance`] when every observation is tied.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> Result<MannWhitney, AnalysisError> {
    if a.len() < 2 {
        return Err(AnalysisError::SampleTooSmall { n: a.len() });
    }
    if b.len() < 2 {
        return Err(AnalysisError::SampleTooSmall { n: b.len() });
    }

    let n_a = a.len() as f64;
    let n_b = b.len() as f64;
    let n = n_a + n_b;

    // Rank the combined sample, averaging ranks within tie groups.
    let mut combined: Vec<(f64, bool)> = a
        .iter()
        .map(|&v| (v, true))
        .chain(b.iter().map(|&v| (v, false)))
        .collect();
    combined.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut rank_sum_a = 0.0;
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < combined.len() {
        let mut j = i + 1;
        while j < combined.len() && combined[j].0 == combined[i].0 {
            j += 1;
        }
        // Ranks i+1..=j averaged across the tie group.
        let midrank = (i + 1 + j) as f64 / 2.0;
        let tie_len = (j - i) as f64;
        tie_term += tie_len * tie_len * tie_len - tie_len;
        for entry in &combined[i..j] {
            if entry.1 {
                rank_sum_a += midrank;
            }
        }
        i = j;
    }

    let u_stat = rank_sum_a - n_a * (n_a + 1.0) / 2.0;

    let mu = n_a * n_b / 2.0;
    let variance = n_a * n_b / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        return Err(AnalysisError::ZeroRankVariance);
    }

    // Continuity-corrected z; a deviation below the correction collapses
    // to p = 1.
    let deviation = (u_stat - mu).abs() - 0.5;
    let p_value = if deviation <= 0.0 {
        1.0
    } else {
        let z = deviation / variance.sqrt();
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| AnalysisError::Distribution(e.to_string()))?;
        (2.0 * (1.0 - normal.cdf(z))).clamp(0.0, 1.0)
    };

    Ok(MannWhitney { u_stat, p_value })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // Descriptive Statistics Tests
    // ============================================================

    #[test]
    fn mean_of_empty_is_zero() {
        assert!((mean(&[]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mean_basic() {
        assert!((mean(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn sample_variance_uses_n_minus_one() {
        // var([1, 2, 3]) with ddof=1 is 1.0
        assert!((sample_variance(&[1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sample_variance_below_two_observations_is_zero() {
        assert!((sample_variance(&[5.0]) - 0.0).abs() < f64::EPSILON);
    }

    // ============================================================
    // weighted_mean Tests
    // ============================================================

    #[test]
    fn weighted_mean_equal_weights_matches_mean() {
        let values = [0.10, 0.08, 0.06, 0.02];
        let weights = [100.0, 100.0, 100.0, 100.0];
        let wm = weighted_mean(&values, &weights).unwrap();
        assert!((wm - mean(&values)).abs() < 1e-12);
    }

    #[test]
    fn weighted_mean_tilts_toward_heavy_weight() {
        let wm = weighted_mean(&[0.10, 0.02], &[900.0, 100.0]).unwrap();
        assert!((wm - 0.092).abs() < 1e-12);
    }

    #[test]
    fn weighted_mean_zero_total_weight_is_error() {
        let result = weighted_mean(&[0.1, 0.2], &[0.0, 0.0]);
        assert!(matches!(result, Err(AnalysisError::NoUsableWeights)));
    }

    #[test]
    fn weighted_mean_empty_is_error() {
        assert!(weighted_mean(&[], &[]).is_err());
    }

    // ============================================================
    // two_sample_t Tests
    // ============================================================

    #[test]
    fn t_test_known_value() {
        // a = [1,2,3], b = [2,3,4]: pooled_std = 1, se = sqrt(2/3),
        // t = -1.2247, df = 4, p ~= 0.288
        let result = two_sample_t(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap();
        assert!((result.t_stat + 1.224_744_871).abs() < 1e-6);
        assert!((result.df - 4.0).abs() < f64::EPSILON);
        assert!(result.p_value > 0.25 && result.p_value < 0.32, "p was {}", result.p_value);
    }

    #[test]
    fn t_test_sample_against_itself_p_is_one() {
        let sample = [0.05, 0.07, 0.03, 0.09, 0.01];
        let result = two_sample_t(&sample, &sample).unwrap();
        assert!((result.t_stat - 0.0).abs() < 1e-12);
        assert!((result.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn t_test_small_sample_is_error() {
        let result = two_sample_t(&[1.0], &[2.0, 3.0]);
        assert!(matches!(result, Err(AnalysisError::SampleTooSmall { n: 1 })));
    }

    #[test]
    fn t_test_zero_variance_is_error() {
        let result = two_sample_t(&[1.0, 1.0, 1.0], &[1.0, 1.0]);
        assert!(matches!(result, Err(AnalysisError::ZeroPooledVariance)));
    }

    #[test]
    fn t_test_detects_separated_samples() {
        let a = [0.10, 0.11, 0.12, 0.09, 0.10, 0.11];
        let b = [0.01, 0.02, 0.00, 0.01, 0.02, 0.01];
        let result = two_sample_t(&a, &b).unwrap();
        assert!(result.t_stat > 5.0);
        assert!(result.p_value < 0.001);
    }

    // ============================================================
    // pooled_std Tests
    // ============================================================

    #[test]
    fn pooled_std_of_unit_variance_samples_is_one() {
        let pooled = pooled_std(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap();
        assert!((pooled - 1.0).abs() < 1e-12);
    }

    // ============================================================
    // mann_whitney_u Tests
    // ============================================================

    #[test]
    fn mann_whitney_fully_separated_samples() {
        // a below b entirely: U for a is 0.
        let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert!((result.u_stat - 0.0).abs() < f64::EPSILON);
        // Asymptotic two-sided p with continuity correction ~= 0.081.
        assert!(result.p_value > 0.05 && result.p_value < 0.12, "p was {}", result.p_value);
    }

    #[test]
    fn mann_whitney_sample_against_itself_p_is_one() {
        let sample = [0.05, 0.07, 0.03, 0.09];
        let result = mann_whitney_u(&sample, &sample).unwrap();
        // U equals its null mean; the continuity correction collapses p to 1.
        assert!((result.p_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mann_whitney_all_tied_is_error() {
        let result = mann_whitney_u(&[1.0, 1.0, 1.0], &[1.0, 1.0]);
        assert!(matches!(result, Err(AnalysisError::ZeroRankVariance)));
    }

    #[test]
    fn mann_whitney_small_sample_is_error() {
        assert!(mann_whitney_u(&[1.0], &[2.0, 3.0]).is_err());
    }

    #[test]
    fn mann_whitney_handles_partial_ties() {
        let result = mann_whitney_u(&[1.0, 2.0, 2.0, 3.0], &[2.0, 4.0, 5.0]).unwrap();
        assert!(result.p_value > 0.0 && result.p_value <= 1.0);
        // U stays within [0, n_a * n_b].
        assert!(result.u_stat >= 0.0 && result.u_stat <= 12.0);
    }

    #[test]
    fn mann_whitney_large_separation_is_significant() {
        let a: Vec<f64> = (0..20).map(|i| 10.0 + f64::from(i)).collect();
        let b: Vec<f64> = (0..20).map(|i| f64::from(i) * 0.1).collect();
        let result = mann_whitney_u(&a, &b).unwrap();
        assert!(result.p_value < 0.001);
    }
}
