//! Geometric annualization of a window's ordered monthly returns.

use fund_bench_core::AnalysisError;

/// Periods per year. The whole engine assumes monthly granularity; a panel
/// at any other frequency would need this constant and the data contract
/// revisited together.
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// Cumulative growth factor `G = prod(1 + r_i)` over an ordered series.
///
/// # Errors
/// [`AnalysisError::EmptyReturnSeries`] for an empty slice;
/// [`AnalysisError::NonPositiveGrowth`] when any `1 + r_i <= 0` (a total
/// loss or worse in one period). Raising a negative base to a fractional
/// power would yield NaN, so this is rejected here rather than downstream.
pub fn compound(ordered_returns: &[f64]) -> Result<f64, AnalysisError> {
    if ordered_returns.is_empty() {
        return Err(AnalysisError::EmptyReturnSeries);
    }
    let mut growth = 1.0;
    for (period_index, &r) in ordered_returns.iter().enumerate() {
        let factor = 1.0 + r;
        if factor <= 0.0 {
            return Err(AnalysisError::NonPositiveGrowth {
                period_index,
                return_fraction: r,
            });
        }
        growth *= factor;
    }
    Ok(growth)
}

/// Annualized return `G^(12/W) - 1` for a window of `W` monthly returns.
///
/// Pure; the window length is taken from the slice itself.
///
/// # Errors
/// Same failure modes as [`compound`].
pub fn annualize(ordered_returns: &[f64]) -> Result<f64, AnalysisError> {
    let growth = compound(ordered_returns)?;
    let exponent = PERIODS_PER_YEAR / ordered_returns.len() as f64;
    Ok(growth.powf(exponent) - 1.0)
}
