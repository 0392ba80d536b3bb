//! Equal-weight and capital-weighted aggregates per cohort, and the
//! excess-return figures derived from them.

use serde::{Deserialize, Serialize};

use fund_bench_core::{stats, AnalysisError};

use crate::cohort::{FundWindowResult, HedgeCohorts};

/// Equal-weight mean of a cohort's annualized returns.
///
/// # Errors
/// [`AnalysisError::EmptyCohort`] for an empty cohort.
pub fn equal_weight_mean(cohort: &[FundWindowResult]) -> Result<f64, AnalysisError> {
    if cohort.is_empty() {
        return Err(AnalysisError::EmptyCohort);
    }
    Ok(stats::mean(&HedgeCohorts::returns_of(cohort)))
}

/// AUM-weighted mean of a cohort's annualized returns.
///
/// Funds with an absent AUM are excluded from numerator and denominator
/// alike; a present zero participates with zero weight. This distinction
/// matters: treating absent as zero would not change the ratio, but it
/// would hide an all-absent cohort behind a zero denominator.
///
/// # Errors
/// [`AnalysisError::EmptyCohort`] for an empty cohort;
/// [`AnalysisError::NoUsableWeights`] when no fund has a present weight or
/// the present weights sum to zero.
pub fn aum_weight_mean(cohort: &[FundWindowResult]) -> Result<f64, AnalysisError> {
    if cohort.is_empty() {
        return Err(AnalysisError::EmptyCohort);
    }
    let (values, weights): (Vec<f64>, Vec<f64>) = cohort
        .iter()
        .filter_map(|f| f.aum.map(|w| (f.annualized_return, w)))
        .unzip();
    stats::weighted_mean(&values, &weights)
}

/// All aggregate statistics for one (window, hedge status) pair: three
/// cohort means under two weighting schemes, plus the four excess returns
/// (active minus passive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowAggregates {
    /// Equal-weight mean of all active funds.
    pub active_all_mean_equal: f64,
    /// Equal-weight mean of the active top half.
    pub active_top_half_mean_equal: f64,
    /// Equal-weight mean of passive funds.
    pub passive_mean_equal: f64,
    /// `active_all_mean_equal - passive_mean_equal`.
    pub excess_all_equal: f64,
    /// `active_top_half_mean_equal - passive_mean_equal`.
    pub excess_top_half_equal: f64,
    /// AUM-weighted mean of all active funds.
    pub active_all_mean_aum: f64,
    /// AUM-weighted mean of the active top half.
    pub active_top_half_mean_aum: f64,
    /// AUM-weighted mean of passive funds.
    pub passive_mean_aum: f64,
    /// `active_all_mean_aum - passive_mean_aum`.
    pub excess_all_aum: f64,
    /// `active_top_half_mean_aum - passive_mean_aum`.
    pub excess_top_half_aum: f64,
}

impl WindowAggregates {
    /// Computes all aggregates for one hedge status.
    ///
    /// # Errors
    /// Propagates the domain errors of [`equal_weight_mean`] and
    /// [`aum_weight_mean`]; the caller skips this (window, hedge status)
    /// pair and continues.
    pub fn compute(cohorts: &HedgeCohorts) -> Result<Self, AnalysisError> {
        let active_all_mean_equal = equal_weight_mean(&cohorts.active_all)?;
        let active_top_half_mean_equal = equal_weight_mean(&cohorts.active_top_half)?;
        let passive_mean_equal = equal_weight_mean(&cohorts.passive)?;

        let active_all_mean_aum = aum_weight_mean(&cohorts.active_all)?;
        let active_top_half_mean_aum = aum_weight_mean(&cohorts.active_top_half)?;
        let passive_mean_aum = aum_weight_mean(&cohorts.passive)?;

        Ok(Self {
            active_all_mean_equal,
            active_top_half_mean_equal,
            passive_mean_equal,
            excess_all_equal: active_all_mean_equal - passive_mean_equal,
            excess_top_half_equal: active_top_half_mean_equal - passive_mean_equal,
            active_all_mean_aum,
            active_top_half_mean_aum,
            passive_mean_aum,
            excess_all_aum: active_all_mean_aum - passive_mean_aum,
            excess_top_half_aum: active_top_half_mean_aum - passive_mean_aum,
        })
    }
}
