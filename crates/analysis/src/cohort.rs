//! Cohort segmentation: hedge status × fund type, with the active
//! top-half split.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use fund_bench_core::{AnalysisError, Fund, FundType, HedgeStatus};

/// Per-fund annualized return for one window, before the attribute join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualizedReturn {
    /// The fund this result belongs to.
    pub fund_id: String,
    /// Window CAGR from geometric compounding.
    pub annualized_return: f64,
    /// Cumulative window return, `G - 1`.
    pub cumulative_return: f64,
}

/// One (fund, window) result joined with the attributes downstream stages
/// need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundWindowResult {
    /// The fund this result belongs to.
    pub fund_id: String,
    /// Descriptive name, carried through unmodified.
    pub fund_name: String,
    /// Active or passive.
    pub fund_type: FundType,
    /// Hedged or unhedged.
    pub currency_hedge: HedgeStatus,
    /// Annual expense ratio, carried through unmodified.
    pub expense_ratio: f64,
    /// Capital weight; `None` when absent from the attribute table.
    pub aum: Option<f64>,
    /// Window CAGR.
    pub annualized_return: f64,
    /// Cumulative window return.
    pub cumulative_return: f64,
}

/// Cohorts for one hedge status within one window.
///
/// `active_all` is sorted by `annualized_return` descending;
/// `active_top_half` is its first `ceil(n/2)` entries. Ties at the
/// boundary are resolved by the stable sort, i.e. by the funds' relative
/// order in the input — an explicit policy, not an accident of the sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeCohorts {
    /// The hedge status this partition covers.
    pub hedge_status: HedgeStatus,
    /// All active funds, best return first.
    pub active_all: Vec<FundWindowResult>,
    /// Top half of `active_all` by return.
    pub active_top_half: Vec<FundWindowResult>,
    /// All passive funds, input order.
    pub passive: Vec<FundWindowResult>,
}

impl HedgeCohorts {
    /// True when both an active and a passive cohort exist. Without
    /// coverage the hedge status is skipped for aggregation and testing.
    #[must_use]
    pub fn has_coverage(&self) -> bool {
        !self.active_all.is_empty() && !self.passive.is_empty()
    }

    /// Size of the top-half cohort, `ceil(0.5 * |active_all|)`.
    #[must_use]
    pub fn top_half_count(&self) -> usize {
        self.active_top_half.len()
    }

    /// Annualized returns of a cohort as a plain sample.
    #[must_use]
    pub fn returns_of(cohort: &[FundWindowResult]) -> Vec<f64> {
        cohort.iter().map(|f| f.annualized_return).collect()
    }
}

/// Joins per-fund window results to fund attributes and partitions them
/// into per-hedge-status cohorts.
///
/// Always returns one [`HedgeCohorts`] per hedge status, in
/// [`HedgeStatus::ALL`] order; empty cohorts are reported as coverage gaps
/// by the caller, not errors here.
///
/// # Errors
/// [`AnalysisError::DataIntegrity`] when a result's fund_id has no
/// attribute row. Internally consistent data can never hit this; it aborts
/// the run.
pub fn segment(
    results: &[AnnualizedReturn],
    funds: &[Fund],
) -> Result<Vec<HedgeCohorts>, AnalysisError> {
    let attrs: HashMap<&str, &Fund> = funds.iter().map(|f| (f.fund_id.as_str(), f)).collect();

    let mut joined = Vec::with_capacity(results.len());
    for result in results {
        let fund = attrs.get(result.fund_id.as_str()).ok_or_else(|| {
            AnalysisError::DataIntegrity {
                fund_id: result.fund_id.clone(),
            }
        })?;
        joined.push(FundWindowResult {
            fund_id: result.fund_id.clone(),
            fund_name: fund.fund_name.clone(),
            fund_type: fund.fund_type,
            currency_hedge: fund.currency_hedge,
            expense_ratio: fund.expense_ratio,
            aum: fund.aum,
            annualized_return: result.annualized_return,
            cumulative_return: result.cumulative_return,
        });
    }

    let mut cohorts = Vec::with_capacity(HedgeStatus::ALL.len());
    for hedge_status in HedgeStatus::ALL {
        let mut active_all: Vec<FundWindowResult> = joined
            .iter()
            .filter(|f| f.currency_hedge == hedge_status && f.fund_type == FundType::Active)
            .cloned()
            .collect();
        let passive: Vec<FundWindowResult> = joined
            .iter()
            .filter(|f| f.currency_hedge == hedge_status && f.fund_type == FundType::Passive)
            .cloned()
            .collect();

        // Stable sort: boundary ties keep input order.
        active_all.sort_by(|a, b| b.annualized_return.total_cmp(&a.annualized_return));
        let top_half_count = active_all.len().div_ceil(2);
        let active_top_half = active_all[..top_half_count].to_vec();

        if active_all.is_empty() || passive.is_empty() {
            warn!(%hedge_status, active = active_all.len(), passive = passive.len(),
                "coverage gap: missing active or passive cohort");
        }

        cohorts.push(HedgeCohorts {
            hedge_status,
            active_all,
            active_top_half,
            passive,
        });
    }
    Ok(cohorts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fund(id: &str, fund_type: FundType, hedge: HedgeStatus, aum: Option<f64>) -> Fund {
        Fund {
            fund_id: id.to_string(),
            fund_name: format!("Fund {id}"),
            fund_type,
            currency_hedge: hedge,
            expense_ratio: 0.01,
            aum,
        }
    }

    fn result(id: &str, annualized: f64) -> AnnualizedReturn {
        AnnualizedReturn {
            fund_id: id.to_string(),
            annualized_return: annualized,
            cumulative_return: (1.0 + annualized).powi(3) - 1.0,
        }
    }

    fn unhedged(cohorts: &[HedgeCohorts]) -> &HedgeCohorts {
        cohorts
            .iter()
            .find(|c| c.hedge_status == HedgeStatus::Unhedged)
            .unwrap()
    }

    // ============================================================
    // segment Tests
    // ============================================================

    #[test]
    fn active_sorted_descending_and_top_half_split() {
        let funds = vec![
            fund("A1", FundType::Active, HedgeStatus::Unhedged, Some(100.0)),
            fund("A2", FundType::Active, HedgeStatus::Unhedged, Some(100.0)),
            fund("A3", FundType::Active, HedgeStatus::Unhedged, Some(100.0)),
            fund("A4", FundType::Active, HedgeStatus::Unhedged, Some(100.0)),
            fund("P1", FundType::Passive, HedgeStatus::Unhedged, Some(100.0)),
        ];
        let results = vec![
            result("A1", 0.02),
            result("A2", 0.10),
            result("A3", 0.06),
            result("A4", 0.08),
            result("P1", 0.07),
        ];
        let cohorts = segment(&results, &funds).unwrap();
        let c = unhedged(&cohorts);

        let order: Vec<&str> = c.active_all.iter().map(|f| f.fund_id.as_str()).collect();
        assert_eq!(order, vec!["A2", "A4", "A3", "A1"]);
        assert_eq!(c.top_half_count(), 2);
        let top: Vec<&str> = c.active_top_half.iter().map(|f| f.fund_id.as_str()).collect();
        assert_eq!(top, vec!["A2", "A4"]);
        assert_eq!(c.passive.len(), 1);
    }

    #[test]
    fn top_half_of_odd_cohort_rounds_up() {
        let funds: Vec<Fund> = (0..5)
            .map(|i| {
                fund(
                    &format!("A{i}"),
                    FundType::Active,
                    HedgeStatus::Unhedged,
                    None,
                )
            })
            .collect();
        let results: Vec<AnnualizedReturn> = (0..5)
            .map(|i| result(&format!("A{i}"), f64::from(i) * 0.01))
            .collect();
        let cohorts = segment(&results, &funds).unwrap();
        assert_eq!(unhedged(&cohorts).top_half_count(), 3);
    }

    #[test]
    fn top_half_members_dominate_the_rest() {
        let funds: Vec<Fund> = (0..7)
            .map(|i| {
                fund(
                    &format!("A{i}"),
                    FundType::Active,
                    HedgeStatus::Unhedged,
                    None,
                )
            })
            .collect();
        let results: Vec<AnnualizedReturn> = vec![
            result("A0", 0.04),
            result("A1", 0.09),
            result("A2", 0.01),
            result("A3", 0.07),
            result("A4", 0.03),
            result("A5", 0.08),
            result("A6", 0.02),
        ];
        let cohorts = segment(&results, &funds).unwrap();
        let c = unhedged(&cohorts);
        let floor = c
            .active_top_half
            .iter()
            .map(|f| f.annualized_return)
            .fold(f64::INFINITY, f64::min);
        for outside in &c.active_all[c.top_half_count()..] {
            assert!(outside.annualized_return <= floor);
        }
    }

    #[test]
    fn boundary_tie_keeps_input_order() {
        let funds = vec![
            fund("A1", FundType::Active, HedgeStatus::Unhedged, None),
            fund("A2", FundType::Active, HedgeStatus::Unhedged, None),
            fund("A3", FundType::Active, HedgeStatus::Unhedged, None),
            fund("A4", FundType::Active, HedgeStatus::Unhedged, None),
        ];
        // A2 and A3 tie at the boundary; A2 appears first in the input.
        let results = vec![
            result("A1", 0.10),
            result("A2", 0.05),
            result("A3", 0.05),
            result("A4", 0.01),
        ];
        let cohorts = segment(&results, &funds).unwrap();
        let top: Vec<&str> = unhedged(&cohorts)
            .active_top_half
            .iter()
            .map(|f| f.fund_id.as_str())
            .collect();
        assert_eq!(top, vec!["A1", "A2"]);
    }

    #[test]
    fn hedge_statuses_partitioned_independently() {
        let funds = vec![
            fund("AU", FundType::Active, HedgeStatus::Unhedged, None),
            fund("AH", FundType::Active, HedgeStatus::Hedged, None),
            fund("PU", FundType::Passive, HedgeStatus::Unhedged, None),
        ];
        let results = vec![result("AU", 0.05), result("AH", 0.04), result("PU", 0.03)];
        let cohorts = segment(&results, &funds).unwrap();

        let u = unhedged(&cohorts);
        assert!(u.has_coverage());
        let h = cohorts
            .iter()
            .find(|c| c.hedge_status == HedgeStatus::Hedged)
            .unwrap();
        assert_eq!(h.active_all.len(), 1);
        assert!(h.passive.is_empty());
        assert!(!h.has_coverage());
    }

    #[test]
    fn missing_attribute_row_is_data_integrity_error() {
        let funds = vec![fund("A1", FundType::Active, HedgeStatus::Unhedged, None)];
        let results = vec![result("A1", 0.05), result("GHOST", 0.02)];
        let err = segment(&results, &funds).unwrap_err();
        assert!(matches!(err, AnalysisError::DataIntegrity { fund_id } if fund_id == "GHOST"));
    }

    #[test]
    fn empty_results_yield_empty_cohorts_for_both_statuses() {
        let cohorts = segment(&[], &[]).unwrap();
        assert_eq!(cohorts.len(), 2);
        assert!(cohorts.iter().all(|c| !c.has_coverage()));
    }
}
