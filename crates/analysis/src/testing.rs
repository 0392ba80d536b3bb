//! Significance testing between cohort return samples.
//!
//! Each comparison pairs a parametric location test (pooled-variance
//! t-test) with a distribution-free rank test (Mann-Whitney U) as a
//! robustness cross-check against non-normality, plus Cohen's d on the
//! same pooled standard deviation.

use serde::{Deserialize, Serialize};

use fund_bench_core::{stats, AnalysisError};

/// Outcome of one two-sample comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// t statistic (pooled variance, two-sided).
    pub t_stat: f64,
    /// Two-sided p-value of the t-test.
    pub p_value_t: f64,
    /// Cohen's d effect size, `(mean(a) - mean(b)) / pooled_std`.
    pub cohens_d: f64,
    /// Mann-Whitney U statistic for sample `a`.
    pub u_stat: f64,
    /// Two-sided p-value of the rank test.
    pub p_value_u: f64,
    /// `p_value_t < alpha`.
    pub significant: bool,
}

/// Both comparisons run per (window, hedge status). A `None` side means
/// that comparison hit a domain error and was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CohortTests {
    /// Active-all vs passive.
    pub all_vs_passive: Option<TestResult>,
    /// Active-top-half vs passive.
    pub top_half_vs_passive: Option<TestResult>,
}

/// Compares two return samples.
///
/// # Errors
/// [`AnalysisError::SampleTooSmall`] below 2 observations per sample,
/// [`AnalysisError::ZeroPooledVariance`] / [`AnalysisError::ZeroRankVariance`]
/// for degenerate zero-variance input. All are domain errors: the caller
/// skips the comparison, not the run.
pub fn compare(a: &[f64], b: &[f64], alpha: f64) -> Result<TestResult, AnalysisError> {
    let t = stats::two_sample_t(a, b)?;
    let pooled = stats::pooled_std(a, b)?;
    // two_sample_t already rejected a zero pooled std.
    let cohens_d = (stats::mean(a) - stats::mean(b)) / pooled;
    let rank = stats::mann_whitney_u(a, b)?;

    Ok(TestResult {
        t_stat: t.t_stat,
        p_value_t: t.p_value,
        cohens_d,
        u_stat: rank.u_stat,
        p_value_u: rank.p_value,
        significant: t.p_value < alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================
    // compare Tests
    // ============================================================

    #[test]
    fn sample_against_itself_is_null() {
        let sample = [0.05, 0.07, 0.03, 0.09, 0.01];
        let result = compare(&sample, &sample, 0.05).unwrap();
        assert!((result.p_value_t - 1.0).abs() < 1e-9);
        assert!(result.cohens_d.abs() < 1e-12);
        assert!(!result.significant);
    }

    #[test]
    fn strong_separation_is_significant_on_both_tests() {
        let a: Vec<f64> = (0..15).map(|i| 0.10 + f64::from(i) * 0.001).collect();
        let b: Vec<f64> = (0..15).map(|i| 0.01 + f64::from(i) * 0.001).collect();
        let result = compare(&a, &b, 0.05).unwrap();
        assert!(result.significant);
        assert!(result.p_value_t < 0.001);
        assert!(result.p_value_u < 0.001);
        assert!(result.cohens_d > 2.0);
    }

    #[test]
    fn cohens_d_known_value() {
        // pooled_std = 1, mean difference = -1 => d = -1.
        let result = compare(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0], 0.05).unwrap();
        assert!((result.cohens_d + 1.0).abs() < 1e-9);
    }

    #[test]
    fn significance_respects_alpha() {
        let a: Vec<f64> = (0..15).map(|i| 0.10 + f64::from(i) * 0.001).collect();
        let b: Vec<f64> = (0..15).map(|i| 0.01 + f64::from(i) * 0.001).collect();
        let strict = compare(&a, &b, 1e-12).unwrap();
        assert!(!strict.significant);
    }

    #[test]
    fn undersized_sample_is_domain_error() {
        let err = compare(&[0.05], &[0.01, 0.02], 0.05).unwrap_err();
        assert!(err.is_domain());
        assert!(matches!(err, AnalysisError::SampleTooSmall { n: 1 }));
    }

    #[test]
    fn zero_variance_is_domain_error_not_infinity() {
        let err = compare(&[0.05, 0.05], &[0.05, 0.05], 0.05).unwrap_err();
        assert!(matches!(err, AnalysisError::ZeroPooledVariance));
    }
}
