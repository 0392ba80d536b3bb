//! Single-window analysis driver.
//!
//! Chains validation, annualization, segmentation, aggregation, and
//! (optionally) significance testing for one window. Domain errors exclude
//! a fund or skip a hedge-status pair; only data-integrity faults abort.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fund_bench_core::{AnalysisConfig, AnalysisError, AnalysisWindow, Fund, HedgeStatus,
    MonthlyReturn};

use crate::aggregate::WindowAggregates;
use crate::annualize::{annualize, compound};
use crate::cohort::{segment, AnnualizedReturn, FundWindowResult, HedgeCohorts};
use crate::testing::{compare, CohortTests};
use crate::window::{validate_window, ExcludedFund, ExclusionReason};

/// One row of the active ranking table for a hedge status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFund {
    /// 1-based rank by descending annualized return.
    pub rank: usize,
    /// True for the first `ceil(n/2)` ranks.
    pub is_top_half: bool,
    /// The ranked fund's window result.
    #[serde(flatten)]
    pub fund: FundWindowResult,
}

/// Everything computed for one hedge status in one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeReport {
    /// The hedge status this report covers.
    pub hedge_status: HedgeStatus,
    /// Active funds with a valid window result.
    pub active_count: usize,
    /// Passive funds with a valid window result.
    pub passive_count: usize,
    /// Size of the active top half.
    pub top_half_count: usize,
    /// Active funds ranked by descending annualized return.
    pub ranking: Vec<RankedFund>,
    /// Aggregates; `None` when this pair was skipped.
    pub aggregates: Option<WindowAggregates>,
    /// Significance tests; `None` when disabled or skipped.
    pub tests: Option<CohortTests>,
    /// Why aggregation was skipped, when it was.
    pub skipped: Option<String>,
}

/// Complete output of a single-window analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowAnalysis {
    /// The analyzed window.
    pub window: AnalysisWindow,
    /// All (fund, window) results, active ranking order then passive, per
    /// hedge status.
    pub fund_results: Vec<FundWindowResult>,
    /// Funds present in the window but excluded, with reasons.
    pub excluded: Vec<ExcludedFund>,
    /// One report per hedge status.
    pub hedge_reports: Vec<HedgeReport>,
}

/// Picks the window of the last `window_months` distinct periods ending at
/// or before `base_date`.
///
/// # Errors
/// [`AnalysisError::InsufficientHistory`] when fewer periods are available.
pub fn window_ending_at(
    periods: &[NaiveDate],
    base_date: NaiveDate,
    window_months: usize,
) -> Result<AnalysisWindow, AnalysisError> {
    let in_range: Vec<NaiveDate> = periods.iter().copied().filter(|&p| p <= base_date).collect();
    if in_range.len() < window_months {
        return Err(AnalysisError::InsufficientHistory {
            required: window_months,
            available: in_range.len(),
        });
    }
    AnalysisWindow::from_periods(in_range[in_range.len() - window_months..].to_vec())
}

/// Runs the full single-window pipeline.
///
/// # Errors
/// [`AnalysisError::DataIntegrity`] when an eligible fund has no attribute
/// row. Domain errors never surface here; they exclude funds or skip
/// hedge-status pairs and are recorded in the output.
pub fn compute_single_window(
    funds: &[Fund],
    returns: &[MonthlyReturn],
    window: &AnalysisWindow,
    config: &AnalysisConfig,
) -> Result<WindowAnalysis, AnalysisError> {
    let mut panel = validate_window(returns, window);

    // Any eligible fund without an attribute row means the panel and the
    // attribute table disagree; abort before producing misleading cohorts.
    for fund_id in panel.eligible.keys() {
        if !funds.iter().any(|f| &f.fund_id == fund_id) {
            return Err(AnalysisError::DataIntegrity {
                fund_id: fund_id.clone(),
            });
        }
    }

    // Annualize in attribute-table order so downstream stable sorts have a
    // deterministic, documented tie-break.
    let mut results = Vec::new();
    for fund in funds {
        let Some(ordered) = panel.eligible.get(&fund.fund_id) else {
            continue;
        };
        match compound(ordered) {
            Ok(growth) => {
                // Eligibility guarantees a non-empty series, so annualize
                // can only repeat compound's verdict.
                let annualized = annualize(ordered)?;
                results.push(AnnualizedReturn {
                    fund_id: fund.fund_id.clone(),
                    annualized_return: annualized,
                    cumulative_return: growth - 1.0,
                });
            }
            Err(err) => {
                warn!(fund_id = %fund.fund_id, %err, "excluding fund from window");
                panel.excluded.push(ExcludedFund {
                    fund_id: fund.fund_id.clone(),
                    observed: ordered.len(),
                    reason: ExclusionReason::NonPositiveGrowth,
                });
            }
        }
    }
    panel.excluded.sort_by(|a, b| a.fund_id.cmp(&b.fund_id));

    let cohorts = segment(&results, funds)?;

    let mut fund_results = Vec::new();
    let mut hedge_reports = Vec::new();
    for cohort in &cohorts {
        fund_results.extend(cohort.active_all.iter().cloned());
        fund_results.extend(cohort.passive.iter().cloned());
        hedge_reports.push(report_for(cohort, config));
    }

    info!(
        start = %window.start_date,
        end = %window.end_date,
        funds = fund_results.len(),
        excluded = panel.excluded.len(),
        "single-window analysis complete"
    );

    Ok(WindowAnalysis {
        window: window.clone(),
        fund_results,
        excluded: panel.excluded,
        hedge_reports,
    })
}

fn report_for(cohort: &HedgeCohorts, config: &AnalysisConfig) -> HedgeReport {
    let top_half_count = cohort.top_half_count();
    let ranking = cohort
        .active_all
        .iter()
        .enumerate()
        .map(|(idx, fund)| RankedFund {
            rank: idx + 1,
            is_top_half: idx < top_half_count,
            fund: fund.clone(),
        })
        .collect();

    let mut report = HedgeReport {
        hedge_status: cohort.hedge_status,
        active_count: cohort.active_all.len(),
        passive_count: cohort.passive.len(),
        top_half_count,
        ranking,
        aggregates: None,
        tests: None,
        skipped: None,
    };

    if !cohort.has_coverage() {
        report.skipped = Some("empty active or passive cohort".to_string());
        return report;
    }

    match WindowAggregates::compute(cohort) {
        Ok(aggregates) => report.aggregates = Some(aggregates),
        Err(err) => {
            warn!(hedge_status = %cohort.hedge_status, %err, "skipping aggregation");
            report.skipped = Some(err.to_string());
            return report;
        }
    }

    if config.run_tests {
        let passive = HedgeCohorts::returns_of(&cohort.passive);
        let all = HedgeCohorts::returns_of(&cohort.active_all);
        let top_half = HedgeCohorts::returns_of(&cohort.active_top_half);

        let all_vs_passive = match compare(&all, &passive, config.alpha) {
            Ok(test) => Some(test),
            Err(err) => {
                warn!(hedge_status = %cohort.hedge_status, %err,
                    "skipping active-all vs passive test");
                None
            }
        };
        let top_half_vs_passive = match compare(&top_half, &passive, config.alpha) {
            Ok(test) => Some(test),
            Err(err) => {
                warn!(hedge_status = %cohort.hedge_status, %err,
                    "skipping top-half vs passive test");
                None
            }
        };
        report.tests = Some(CohortTests {
            all_vs_passive,
            top_half_vs_passive,
        });
    }

    report
}
