//! Rolling-window orchestration and summary reduction.
//!
//! Slides a fixed-length window across the distinct period axis at stride
//! one and runs the single-window pipeline on each. Consecutive windows
//! overlap heavily, so per-window statistics are serially correlated; the
//! summary is descriptive and applies no multiple-comparison correction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fund_bench_core::{stats, AnalysisConfig, AnalysisError, AnalysisWindow, Fund, HedgeStatus,
    MonthlyReturn};

use crate::aggregate::WindowAggregates;
use crate::engine::compute_single_window;
use crate::testing::CohortTests;
use crate::window::distinct_periods;

/// One (window, hedge status) row of the rolling output. Only emitted when
/// aggregation succeeded for the pair; skipped pairs become
/// [`CoverageGap`]s instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingResult {
    /// First period of the window.
    pub window_start: NaiveDate,
    /// Last period of the window.
    pub window_end: NaiveDate,
    /// Hedge status of this row.
    pub hedge_status: HedgeStatus,
    /// Eligible active funds in the window.
    pub active_count: usize,
    /// Eligible passive funds in the window.
    pub passive_count: usize,
    /// Size of the active top half.
    pub top_half_count: usize,
    /// Cohort means and excess returns for this pair.
    pub aggregates: WindowAggregates,
    /// Significance tests, when enabled and computable.
    pub tests: Option<CohortTests>,
}

/// A (window, hedge status) pair that produced no aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// Last period of the affected window.
    pub window_end: NaiveDate,
    /// Hedge status of the skipped pair.
    pub hedge_status: HedgeStatus,
    /// Why the pair was skipped.
    pub reason: String,
}

/// Complete output of a rolling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingAnalysis {
    /// One row per (window, hedge status) pair with coverage.
    pub results: Vec<RollingResult>,
    /// Number of windows analyzed, `periods - W + 1`.
    pub window_count: usize,
    /// Total fund exclusions across all windows. A fund excluded from
    /// several windows counts once per window.
    pub exclusion_count: usize,
    /// Pairs skipped for missing coverage or degenerate cohorts.
    pub coverage_gaps: Vec<CoverageGap>,
}

/// Descriptive statistics of one excess-return series across windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExcessStats {
    /// Mean across windows.
    pub mean: f64,
    /// Sample standard deviation across windows.
    pub std_dev: f64,
    /// Smallest window value.
    pub min: f64,
    /// Largest window value.
    pub max: f64,
}

impl ExcessStats {
    fn from_sample(values: &[f64]) -> Self {
        Self {
            mean: stats::mean(values),
            std_dev: stats::sample_std_dev(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Cross-window reduction for one hedge status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingSummary {
    /// The hedge status summarized.
    pub hedge_status: HedgeStatus,
    /// Windows contributing to this summary.
    pub window_count: usize,
    /// Equal-weight excess of all active funds.
    pub excess_all_equal: ExcessStats,
    /// Equal-weight excess of the active top half.
    pub excess_top_half_equal: ExcessStats,
    /// AUM-weighted excess of all active funds.
    pub excess_all_aum: ExcessStats,
    /// AUM-weighted excess of the active top half.
    pub excess_top_half_aum: ExcessStats,
    /// Share of windows where the top-half vs passive t-test was
    /// significant, over windows where the test ran.
    pub top_half_significant_share: Option<f64>,
}

/// Runs the single-window pipeline over every full-length window in the
/// panel, stride one.
///
/// # Errors
/// [`AnalysisError::InsufficientHistory`] when the panel spans fewer
/// distinct periods than one window; [`AnalysisError::DataIntegrity`] from
/// any window. Domain-level conditions never abort: they become coverage
/// gaps or exclusions in the output.
pub fn run_rolling(
    funds: &[Fund],
    returns: &[MonthlyReturn],
    config: &AnalysisConfig,
) -> Result<RollingAnalysis, AnalysisError> {
    let periods = distinct_periods(returns);
    let window_months = config.window_months;
    if periods.len() < window_months {
        return Err(AnalysisError::InsufficientHistory {
            required: window_months,
            available: periods.len(),
        });
    }

    let window_count = periods.len() - window_months + 1;
    if window_count < config.min_windows {
        warn!(
            window_count,
            min_windows = config.min_windows,
            "fewer windows than configured minimum; summary statistics will be noisy"
        );
    }

    let mut analysis = RollingAnalysis {
        results: Vec::new(),
        window_count,
        exclusion_count: 0,
        coverage_gaps: Vec::new(),
    };

    for offset in 0..window_count {
        let window =
            AnalysisWindow::from_periods(periods[offset..offset + window_months].to_vec())?;
        let single = compute_single_window(funds, returns, &window, config)?;
        analysis.exclusion_count += single.excluded.len();

        for report in single.hedge_reports {
            match report.aggregates {
                Some(aggregates) => analysis.results.push(RollingResult {
                    window_start: window.start_date,
                    window_end: window.end_date,
                    hedge_status: report.hedge_status,
                    active_count: report.active_count,
                    passive_count: report.passive_count,
                    top_half_count: report.top_half_count,
                    aggregates,
                    tests: report.tests,
                }),
                None => analysis.coverage_gaps.push(CoverageGap {
                    window_end: window.end_date,
                    hedge_status: report.hedge_status,
                    reason: report
                        .skipped
                        .unwrap_or_else(|| "aggregation skipped".to_string()),
                }),
            }
        }
    }

    info!(
        windows = analysis.window_count,
        rows = analysis.results.len(),
        gaps = analysis.coverage_gaps.len(),
        exclusions = analysis.exclusion_count,
        "rolling analysis complete"
    );
    Ok(analysis)
}

/// Reduces rolling rows to one summary per hedge status with coverage.
///
/// Statuses with no rows produce no summary. Overlapping windows mean the
/// per-window values are not independent draws; the standard deviations
/// here describe dispersion, not sampling error.
#[must_use]
pub fn summarize(analysis: &RollingAnalysis) -> Vec<RollingSummary> {
    let mut summaries = Vec::new();
    for hedge_status in HedgeStatus::ALL {
        let rows: Vec<&RollingResult> = analysis
            .results
            .iter()
            .filter(|r| r.hedge_status == hedge_status)
            .collect();
        if rows.is_empty() {
            continue;
        }

        let series = |f: fn(&WindowAggregates) -> f64| -> Vec<f64> {
            rows.iter().map(|r| f(&r.aggregates)).collect()
        };

        let tested: Vec<bool> = rows
            .iter()
            .filter_map(|r| r.tests.as_ref())
            .filter_map(|t| t.top_half_vs_passive.as_ref())
            .map(|t| t.significant)
            .collect();
        let top_half_significant_share = if tested.is_empty() {
            None
        } else {
            Some(tested.iter().filter(|&&s| s).count() as f64 / tested.len() as f64)
        };

        summaries.push(RollingSummary {
            hedge_status,
            window_count: rows.len(),
            excess_all_equal: ExcessStats::from_sample(&series(|a| a.excess_all_equal)),
            excess_top_half_equal: ExcessStats::from_sample(&series(|a| a.excess_top_half_equal)),
            excess_all_aum: ExcessStats::from_sample(&series(|a| a.excess_all_aum)),
            excess_top_half_aum: ExcessStats::from_sample(&series(|a| a.excess_top_half_aum)),
            top_half_significant_share,
        });
    }
    summaries
}
